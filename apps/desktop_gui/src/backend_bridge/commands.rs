//! Backend commands queued from UI to backend worker.

use shared::{domain::PlaceId, protocol::SearchRequest};

#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    Search(SearchRequest),
    FetchVibe { place_id: PlaceId },
    FetchReviews { place_id: PlaceId },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Search(_) => "search",
            BackendCommand::FetchVibe { .. } => "fetch_vibe",
            BackendCommand::FetchReviews { .. } => "fetch_reviews",
        }
    }
}
