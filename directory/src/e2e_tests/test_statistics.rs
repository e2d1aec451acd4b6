//! Test statistics and distinct-value endpoints.

use axum::extract::State;

use crate::e2e_tests::helpers::*;
use crate::http::{statistics, unique_locations, unique_services};

#[tokio::test]
async fn test_statistics_on_empty_directory() {
    let stats = statistics(State(state_with(&[])))
        .await
        .expect("statistics")
        .0;

    assert_eq!(stats.tree.node_count, 1);
    assert_eq!(stats.tree.total_records, 0);
    assert_eq!(stats.tree.height, 1);
    assert_eq!(stats.tree.minimum_degree, TEST_DEGREE);
    assert!(stats.services.is_empty());
    assert!(stats.locations.is_empty());
}

#[tokio::test]
async fn test_statistics_on_sample() {
    let stats = statistics(State(state_with(SAMPLE)))
        .await
        .expect("statistics")
        .0;

    // Root [20] over leaves [10] and [30, 40, 50]
    assert_eq!(stats.tree.node_count, 3);
    assert_eq!(stats.tree.total_records, 5);
    assert_eq!(stats.tree.height, 2);

    assert_eq!(stats.services.get("Electricista"), Some(&2));
    assert_eq!(stats.services.get("Plomero"), Some(&1));
    assert_eq!(stats.services.get("plomero"), Some(&1));
    assert_eq!(stats.locations.get("Cusco"), Some(&2));
}

#[tokio::test]
async fn test_unique_values() {
    let services = unique_services(State(state_with(SAMPLE)))
        .await
        .expect("services")
        .0;
    assert_eq!(services, vec!["Electricista", "Pintor", "Plomero", "plomero"]);

    let locations = unique_locations(State(state_with(SAMPLE)))
        .await
        .expect("locations")
        .0;
    assert_eq!(locations, vec!["Arequipa", "Cusco", "Lima", "lima"]);
}
