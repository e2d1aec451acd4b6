// Life of a request:
// 1. JSON comes in over HTTP
// 2. For inserts:
//     - Validate required fields and rating range
//     - Search the tree to reject duplicate ids
//     - Insert into the B-tree
//    For queries:
//     - Search by id, scan by attribute, or dump in order
//     - Time the call and respond
//
// System components:
//  - B-tree index keyed by provider id
//  - Directory facade holding the business rules
//  - HTTP API
#![cfg_attr(test, allow(clippy::disallowed_methods, clippy::unwrap_used, clippy::expect_used))]

pub mod btree;
pub mod config;
pub mod directory;
pub mod http;
pub mod seed;
pub mod types;

mod e2e_tests;
#[cfg(test)]
mod testing;

pub use directory::{DirectoryError, NewProvider, ProviderDirectory};
