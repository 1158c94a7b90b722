//! Client side of the place search: settings, the HTTP search client, and
//! the controller that drives the search request lifecycle.

pub mod config;
pub mod controller;
pub mod error;
pub mod search_client;
pub mod state;

pub use config::{load_settings, ClientSettings};
pub use controller::{SearchController, SearchEvent, SearchTask};
pub use error::{SearchError, GENERIC_SEARCH_ERROR};
pub use search_client::{HttpSearchClient, SearchBackend};
pub use state::{
    LifecyclePhase, OverlapPolicy, RequestId, RequestState, Resolution, SearchMachine,
    SearchSnapshot,
};

#[cfg(test)]
#[path = "tests/search_client_tests.rs"]
mod search_client_tests;
