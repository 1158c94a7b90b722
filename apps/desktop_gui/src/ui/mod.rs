//! UI layer for desktop GUI: app shell, search form, and results list.

pub mod app;
pub mod results_list;
pub mod search_input;

pub use app::SearchApp;
