//! Builders shared by unit and end-to-end tests.

use crate::btree::Key;
use crate::directory::NewProvider;
use crate::types::Provider;

/// Build a stored provider record.
pub fn provider(id: Key, name: &str, service_type: &str, rating: f64, location: &str) -> Provider {
    Provider {
        id,
        name: name.to_string(),
        service_type: service_type.to_string(),
        rating,
        location: Some(location.to_string()),
    }
}

/// Build a fully populated submission.
pub fn new_provider(
    id: Key,
    name: &str,
    service_type: &str,
    rating: f64,
    location: &str,
) -> NewProvider {
    NewProvider {
        id: Some(id),
        name: Some(name.to_string()),
        service_type: Some(service_type.to_string()),
        rating: Some(rating),
        location: Some(location.to_string()),
    }
}
