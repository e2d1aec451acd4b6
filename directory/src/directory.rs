//! Provider directory: the business rules in front of the B-tree.
//!
//! The tree itself accepts anything. This layer is where incoming providers
//! are checked for required fields, rating range and id uniqueness before
//! they are inserted, and where query timings and distributions are
//! computed for reporting.
//!
//! # Invariants
//!
//! - Every record in the tree passed validation, so ids are unique and every
//!   record carries a non-blank location
//! - Records are never removed once added

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::btree::{BTree, BTreeError, Key, TreeStats};
use crate::types::{Field, Provider, SortMode};

/// Lowest accepted rating.
pub const MIN_RATING: f64 = 1.0;
/// Highest accepted rating.
pub const MAX_RATING: f64 = 5.0;

/// A provider as submitted by a client, before validation.
///
/// Every field is optional so that a missing field can be reported by name
/// instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewProvider {
    pub id: Option<Key>,
    pub name: Option<String>,
    pub service_type: Option<String>,
    pub rating: Option<f64>,
    pub location: Option<String>,
}

/// Result of a timed query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timed<T> {
    pub value: T,
    /// Wall-clock time spent in the tree, in milliseconds rounded to 2 decimals.
    pub elapsed_ms: f64,
}

/// Tree statistics plus how providers are distributed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryStatistics {
    #[serde(flatten)]
    pub tree: TreeStats,
    /// Provider count per service type, exact spelling.
    pub services: BTreeMap<String, usize>,
    /// Provider count per location, exact spelling.
    pub locations: BTreeMap<String, usize>,
}

/// Errors returned when adding or querying providers.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectoryError {
    /// A required field was not supplied.
    MissingField(&'static str),
    /// A provider with this id already exists.
    DuplicateId(Key),
    /// Rating outside `[MIN_RATING, MAX_RATING]`.
    RatingOutOfRange(f64),
    /// Location is empty or only whitespace.
    EmptyLocation,
    /// The tree rejected the operation.
    Tree(BTreeError),
}

impl std::fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(name) => write!(f, "missing required field: {name}"),
            Self::DuplicateId(id) => write!(f, "provider id {id} already exists"),
            Self::RatingOutOfRange(rating) => write!(
                f,
                "rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
            ),
            Self::EmptyLocation => write!(f, "location is required"),
            Self::Tree(e) => write!(f, "tree error: {e}"),
        }
    }
}

impl std::error::Error for DirectoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Tree(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BTreeError> for DirectoryError {
    fn from(e: BTreeError) -> Self {
        Self::Tree(e)
    }
}

/// The provider directory.
///
/// Constructed once at startup and handed to whatever serves requests.
/// Not synchronized: callers sharing it across threads must wrap it in a lock.
#[derive(Debug)]
pub struct ProviderDirectory {
    tree: BTree<Provider>,
}

fn round_ms(start: Instant) -> f64 {
    (start.elapsed().as_secs_f64() * 1000.0 * 100.0).round() / 100.0
}

#[allow(clippy::disallowed_methods)] // Clone hands records out from under the caller's lock
fn owned(providers: Vec<&Provider>) -> Vec<Provider> {
    providers.into_iter().cloned().collect()
}

impl ProviderDirectory {
    /// Create an empty directory backed by a tree of the given minimum degree.
    pub fn new(minimum_degree: usize) -> Result<Self, DirectoryError> {
        let tree = BTree::new(minimum_degree)?;
        tracing::debug!("created provider directory with minimum degree {minimum_degree}");
        Ok(Self { tree })
    }

    /// Number of providers stored.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tree.len()
    }

    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // BTree::is_empty() is not const
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Validate and insert a provider.
    ///
    /// Checks run in order: required fields, id uniqueness, rating range,
    /// non-blank location.
    pub fn add(&mut self, new: NewProvider) -> Result<Key, DirectoryError> {
        let provider = match Self::validate(&self.tree, new) {
            Ok(provider) => provider,
            Err(e) => {
                tracing::warn!("rejected provider: {e}");
                return Err(e);
            }
        };

        let id = provider.id;
        tracing::info!(
            "adding provider {id} ({}, {})",
            provider.name,
            provider.service_type
        );
        self.tree.insert(id, provider);
        Ok(id)
    }

    fn validate(tree: &BTree<Provider>, new: NewProvider) -> Result<Provider, DirectoryError> {
        let NewProvider {
            id,
            name,
            service_type,
            rating,
            location,
        } = new;

        let id = id.ok_or(DirectoryError::MissingField("id"))?;
        let name = name.ok_or(DirectoryError::MissingField("name"))?;
        let service_type = service_type.ok_or(DirectoryError::MissingField("service_type"))?;
        let rating = rating.ok_or(DirectoryError::MissingField("rating"))?;
        let location = location.ok_or(DirectoryError::MissingField("location"))?;

        if tree.search(id).is_some() {
            return Err(DirectoryError::DuplicateId(id));
        }
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(DirectoryError::RatingOutOfRange(rating));
        }
        if location.trim().is_empty() {
            return Err(DirectoryError::EmptyLocation);
        }

        Ok(Provider {
            id,
            name,
            service_type,
            rating,
            location: Some(location),
        })
    }

    /// Look up a provider by id.
    #[must_use]
    #[allow(clippy::disallowed_methods)]
    pub fn find_by_id(&self, id: Key) -> Timed<Option<Provider>> {
        let start = Instant::now();
        let value = self.tree.search(id).cloned();
        let elapsed_ms = round_ms(start);
        tracing::debug!("find_by_id({id}) found={} in {elapsed_ms}ms", value.is_some());
        Timed { value, elapsed_ms }
    }

    /// All providers offering `service_type`, ignoring case.
    pub fn find_by_service(&self, service_type: &str) -> Result<Timed<Vec<Provider>>, DirectoryError> {
        self.scan(Field::ServiceType, service_type)
    }

    /// All providers at `location`, ignoring case.
    pub fn find_by_location(&self, location: &str) -> Result<Timed<Vec<Provider>>, DirectoryError> {
        self.scan(Field::Location, location)
    }

    fn scan(&self, field: Field, value: &str) -> Result<Timed<Vec<Provider>>, DirectoryError> {
        let start = Instant::now();
        let found = owned(self.tree.scan_by(field, value)?);
        let elapsed_ms = round_ms(start);
        tracing::debug!(
            "scan {}={value:?} matched {} in {elapsed_ms}ms",
            field.name(),
            found.len()
        );
        Ok(Timed {
            value: found,
            elapsed_ms,
        })
    }

    /// Every provider in the requested order.
    pub fn list(&self, sort_mode: SortMode) -> Result<Vec<Provider>, DirectoryError> {
        Ok(owned(self.tree.ordered_dump(sort_mode)?))
    }

    /// Tree statistics plus service and location distributions.
    #[must_use]
    #[allow(clippy::disallowed_methods)]
    pub fn statistics(&self) -> DirectoryStatistics {
        let mut services = BTreeMap::new();
        let mut locations = BTreeMap::new();
        for provider in self.tree.in_order() {
            *services.entry(provider.service_type.clone()).or_insert(0) += 1;
            if let Some(location) = &provider.location {
                *locations.entry(location.clone()).or_insert(0) += 1;
            }
        }
        DirectoryStatistics {
            tree: self.tree.stats(),
            services,
            locations,
        }
    }

    /// Distinct service types, sorted.
    #[must_use]
    pub fn unique_services(&self) -> Vec<String> {
        self.tree
            .in_order()
            .into_iter()
            .map(|p| p.service_type.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Distinct locations, sorted.
    #[must_use]
    pub fn unique_locations(&self) -> Vec<String> {
        self.tree
            .in_order()
            .into_iter()
            .filter_map(|p| p.location.as_deref())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
