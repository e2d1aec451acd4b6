//! Service provider record and the fields it can be queried by.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::btree::Key;

/// A service provider stored in the directory.
///
/// The index key is `id`, duplicated here so that query results are
/// self-describing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::disallowed_methods)] // Clone needed to hand records out of the tree
pub struct Provider {
    pub id: Key,
    pub name: String,
    pub service_type: String,
    /// Expected to lie in `[1, 5]`. Not enforced here.
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Text fields a predicate scan can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ServiceType,
    Location,
}

impl Field {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ServiceType => "service_type",
            Self::Location => "location",
        }
    }
}

impl Provider {
    /// Get a text field by name. `None` if the record does not carry it.
    #[must_use]
    pub fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::ServiceType => Some(self.service_type.as_str()),
            Field::Location => self.location.as_deref(),
        }
    }
}

/// Order in which to enumerate providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Ascending id, straight from the tree.
    Key,
    /// Ascending case-insensitive name.
    #[default]
    Name,
    /// Descending rating.
    RatingDesc,
    /// Ascending case-insensitive location.
    Location,
}

/// Error returned when a sort mode string is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSortModeError(pub String);

impl std::fmt::Display for ParseSortModeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown sort mode '{}' (expected key, name, rating or location)",
            self.0
        )
    }
}

impl std::error::Error for ParseSortModeError {}

impl FromStr for SortMode {
    type Err = ParseSortModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "key" | "id" => Ok(Self::Key),
            "name" => Ok(Self::Name),
            "rating" => Ok(Self::RatingDesc),
            "location" => Ok(Self::Location),
            _ => Err(ParseSortModeError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_access() {
        let provider = Provider {
            id: 1,
            name: "Ana".to_string(),
            service_type: "Plumber".to_string(),
            rating: 4.5,
            location: None,
        };
        assert_eq!(provider.field(Field::ServiceType), Some("Plumber"));
        assert_eq!(provider.field(Field::Location), None);
    }

    #[test]
    fn test_sort_mode_parse() {
        assert_eq!("key".parse(), Ok(SortMode::Key));
        assert_eq!("id".parse(), Ok(SortMode::Key));
        assert_eq!("Name".parse(), Ok(SortMode::Name));
        assert_eq!("rating".parse(), Ok(SortMode::RatingDesc));
        assert_eq!("location".parse(), Ok(SortMode::Location));
        assert_eq!(
            "price".parse::<SortMode>(),
            Err(ParseSortModeError("price".to_string()))
        );
        assert_eq!(SortMode::default(), SortMode::Name);
    }

    #[test]
    fn test_location_is_optional_on_the_wire() {
        let provider: Provider = serde_json::from_str(
            r#"{"id": 3, "name": "Luis", "service_type": "Electrician", "rating": 5}"#,
        )
        .expect("parse");
        assert_eq!(provider.location, None);
        assert!((provider.rating - 5.0).abs() < f64::EPSILON);

        let json = serde_json::to_string(&provider).expect("serialize");
        assert!(!json.contains("location"));
    }
}
