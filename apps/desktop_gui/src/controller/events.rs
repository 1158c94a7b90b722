//! UI/backend events and error modeling for desktop GUI controller.

use client_core::SearchSnapshot;
use shared::{
    domain::PlaceId,
    protocol::{Review, VibeSummary},
};

#[derive(Debug, Clone)]
pub enum UiEvent {
    Info(String),
    SearchStateChanged(SearchSnapshot),
    VibeLoaded(VibeSummary),
    VibeMissing { place_id: PlaceId },
    VibeFailed { place_id: PlaceId, reason: String },
    ReviewsLoaded { place_id: PlaceId, reviews: Vec<Review> },
    ReviewsFailed { place_id: PlaceId, reason: String },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("invalid")
            || message_lower.contains("unsupported scheme")
            || message_lower.contains("has no host")
            || message_lower.contains("malformed")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("connection")
            || message_lower.contains("unreachable")
            || message_lower.contains("transport")
            || message_lower.contains("disconnected")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn label(&self) -> &'static str {
        match self.category {
            UiErrorCategory::Transport => "Connection",
            UiErrorCategory::Validation => "Configuration",
            UiErrorCategory::Unknown => "Unexpected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_bad_server_url_as_validation() {
        let err = UiError::from_message(
            UiErrorContext::BackendStartup,
            "invalid search service url 'ht!tp://'",
        );
        assert_eq!(err.category(), UiErrorCategory::Validation);
        assert_eq!(err.label(), "Configuration");
        assert_eq!(err.context(), UiErrorContext::BackendStartup);
    }

    #[test]
    fn classifies_disconnected_queue_as_transport() {
        let err = UiError::from_message(
            UiErrorContext::General,
            "Backend command processor disconnected (possible startup/runtime failure)",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
    }

    #[test]
    fn falls_back_to_unknown() {
        let err = UiError::from_message(UiErrorContext::General, "something odd");
        assert_eq!(err.category(), UiErrorCategory::Unknown);
        assert_eq!(err.message(), "something odd");
    }
}
