use shared::error::ApiException;
use thiserror::Error;

/// The only failure text a user ever sees for a search.
pub const GENERIC_SEARCH_ERROR: &str = "Sorry, something went wrong. Please try again.";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("search service rejected the request: {0}")]
    Status(#[from] ApiException),
    #[error("malformed response body: {0}")]
    MalformedBody(String),
    #[error("search task ended without an outcome: {0}")]
    Abandoned(String),
}

impl SearchError {
    pub fn user_message(&self) -> &'static str {
        GENERIC_SEARCH_ERROR
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            SearchError::Status(api) => Some(api.status),
            SearchError::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
