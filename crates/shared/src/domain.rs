use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(PlaceId);

/// One entry of a search result set, exactly as the search service sent it.
pub type PlaceRecord = Value;

/// Read-only view over a [`PlaceRecord`] used by renderers.
///
/// Every field is optional: the record shape belongs to the search service
/// and a missing or mistyped field simply renders as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceSummary {
    pub id: Option<PlaceId>,
    pub name: Option<String>,
    pub city: Option<String>,
    pub category: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl PlaceSummary {
    pub fn from_record(record: &PlaceRecord) -> Self {
        let text = |key: &str| {
            record
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };
        let number = |key: &str| record.get(key).and_then(Value::as_f64);

        Self {
            id: record.get("id").and_then(Value::as_i64).map(PlaceId),
            name: text("name"),
            city: text("city"),
            category: text("category"),
            address: text("address"),
            latitude: number("latitude"),
            longitude: number("longitude"),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed place")
    }

    /// "category · city" style subtitle, or `None` when neither is known.
    pub fn subtitle(&self) -> Option<String> {
        match (self.category.as_deref(), self.city.as_deref()) {
            (Some(category), Some(city)) => Some(format!("{category} · {city}")),
            (Some(only), None) | (None, Some(only)) => Some(only.to_string()),
            (None, None) => None,
        }
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reads_backend_place_row() {
        let record = json!({
            "id": 4,
            "name": "Blue Tokai",
            "city": "Delhi",
            "category": "cafe",
            "address": null,
            "latitude": 28.55,
            "longitude": 77.2
        });

        let place = PlaceSummary::from_record(&record);
        assert_eq!(place.id, Some(PlaceId(4)));
        assert_eq!(place.display_name(), "Blue Tokai");
        assert_eq!(place.subtitle().as_deref(), Some("cafe · Delhi"));
        assert_eq!(place.address, None);
        assert_eq!(place.coordinates(), Some((28.55, 77.2)));
    }

    #[test]
    fn tolerates_foreign_record_shapes() {
        let place = PlaceSummary::from_record(&json!({ "name": "Cafe X" }));
        assert_eq!(place.display_name(), "Cafe X");
        assert_eq!(place.id, None);
        assert_eq!(place.subtitle(), None);

        let place = PlaceSummary::from_record(&json!("not an object"));
        assert_eq!(place, PlaceSummary::default());
        assert_eq!(place.display_name(), "Unnamed place");
    }

    #[test]
    fn blank_strings_count_as_missing() {
        let place = PlaceSummary::from_record(&json!({ "name": "  ", "city": "Pune" }));
        assert_eq!(place.name, None);
        assert_eq!(place.subtitle().as_deref(), Some("Pune"));
    }
}
