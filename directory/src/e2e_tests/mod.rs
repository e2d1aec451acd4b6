//! End-to-end tests at the HTTP request/response level.
//!
//! Handler tests call the axum handlers directly with extracted inputs.
//! Route tests start a real server on an ephemeral port and speak HTTP/1.1
//! to it over a plain TCP stream.

#![cfg(test)]

mod helpers;

mod test_add_provider;
mod test_listing;
mod test_lookup;
mod test_routes;
mod test_statistics;
