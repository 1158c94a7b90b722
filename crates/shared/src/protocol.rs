use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{PlaceId, PlaceRecord};

/// Search criteria as typed by the user. Serialized as the query string of
/// `GET /search/`, so both fields are always sent, even when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub city: String,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            city: city.into(),
        }
    }
}

/// Only `results` is load-bearing; the echoed `query` is kept as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<Value>,
    pub results: Vec<PlaceRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VibeSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub place_id: PlaceId,
    pub summary: String,
    #[serde(default)]
    pub mood_tags: Vec<String>,
    #[serde(default)]
    pub key_themes: Vec<String>,
}

/// One scraped review of a place, as listed by `GET /places/{id}/reviews`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub place_id: PlaceId,
    pub source: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn search_response_requires_results_array() {
        assert!(serde_json::from_value::<SearchResponse>(json!({ "query": "x" })).is_err());
        assert!(
            serde_json::from_value::<SearchResponse>(json!({ "results": { "name": "x" } }))
                .is_err()
        );
        assert!(serde_json::from_value::<SearchResponse>(json!({ "results": null })).is_err());

        let parsed: SearchResponse =
            serde_json::from_value(json!({ "results": [{ "name": "Cafe X" }] })).expect("parse");
        assert_eq!(parsed.query, None);
        assert_eq!(parsed.results, vec![json!({ "name": "Cafe X" })]);
    }

    #[test]
    fn search_response_accepts_any_query_echo() {
        for echo in [json!(42), json!(null), json!({ "text": "cafe" }), json!("cafe")] {
            let parsed: SearchResponse =
                serde_json::from_value(json!({ "query": echo, "results": [{ "name": "Cafe X" }] }))
                    .expect("parse");
            assert_eq!(parsed.results, vec![json!({ "name": "Cafe X" })]);
        }
    }

    #[test]
    fn vibe_summary_defaults_missing_lists() {
        let vibe: VibeSummary = serde_json::from_value(json!({
            "place_id": 3,
            "summary": "Cozy ☕"
        }))
        .expect("parse");
        assert_eq!(vibe.place_id, PlaceId(3));
        assert!(vibe.mood_tags.is_empty());
        assert!(vibe.key_themes.is_empty());
    }

    #[test]
    fn review_tolerates_missing_rating_and_date() {
        let review: Review = serde_json::from_value(json!({
            "id": 9,
            "place_id": 3,
            "source": "Google Maps",
            "content": "Great views, loud music.",
            "rating": null
        }))
        .expect("parse");
        assert_eq!(review.place_id, PlaceId(3));
        assert_eq!(review.rating, None);
        assert_eq!(review.date, None);
    }
}
