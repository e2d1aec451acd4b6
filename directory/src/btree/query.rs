//! Provider queries layered on the B-tree.
//!
//! Only key order is native to the tree. Attribute scans walk every node and
//! alternative orderings re-sort the materialized in-order list.

use std::cmp::Ordering;

use crate::btree::tree::{BTree, BTreeError};
use crate::types::{Field, Provider, SortMode};

fn require(provider: &Provider, field: Field) -> Result<&str, BTreeError> {
    provider.field(field).ok_or(BTreeError::MissingField {
        key: provider.id,
        field: field.name(),
    })
}

fn cmp_case_insensitive(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

impl BTree<Provider> {
    /// All providers whose `field` equals `value`, ignoring case.
    ///
    /// Results come back in pre-order visit order, not sorted.
    pub fn scan_by(&self, field: Field, value: &str) -> Result<Vec<&Provider>, BTreeError> {
        let needle = value.to_lowercase();
        let mut results = Vec::new();
        self.for_each_node_preorder(|node| {
            for provider in &node.payloads {
                if require(provider, field)?.to_lowercase() == needle {
                    results.push(provider);
                }
            }
            Ok::<(), BTreeError>(())
        })?;
        Ok(results)
    }

    /// Every provider, in the requested order.
    ///
    /// Sorts are stable, so ties keep ascending id order.
    pub fn ordered_dump(&self, sort_mode: SortMode) -> Result<Vec<&Provider>, BTreeError> {
        let mut providers = self.in_order();
        match sort_mode {
            SortMode::Key => {}
            SortMode::Name => {
                providers.sort_by(|a, b| cmp_case_insensitive(&a.name, &b.name));
            }
            SortMode::RatingDesc => {
                providers.sort_by(|a, b| b.rating.total_cmp(&a.rating));
            }
            SortMode::Location => {
                // Surface the first record without a location before sorting
                for provider in &providers {
                    require(provider, Field::Location)?;
                }
                providers.sort_by(|a, b| {
                    cmp_case_insensitive(
                        a.location.as_deref().unwrap_or_default(),
                        b.location.as_deref().unwrap_or_default(),
                    )
                });
            }
        }
        Ok(providers)
    }
}
