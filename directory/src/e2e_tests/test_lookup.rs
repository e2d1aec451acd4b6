//! Test id lookup and attribute searches.

use axum::extract::{Path, State};

use crate::e2e_tests::helpers::*;
use crate::http::{find_provider, search_by_location, search_by_service};

#[tokio::test]
async fn test_find_existing_provider() {
    let state = state_with(SAMPLE);

    let response = find_provider(State(state), Ok(Path(30)))
        .await
        .expect("lookup")
        .0;

    assert!(response.found);
    assert!(response.message.is_none());
    assert_eq!(response.result.map(|p| p.name), Some("Carla Diaz".to_string()));
}

#[tokio::test]
async fn test_find_missing_provider() {
    let state = state_with(SAMPLE);

    let response = find_provider(State(state), Ok(Path(25)))
        .await
        .expect("lookup")
        .0;

    assert!(!response.found);
    assert!(response.result.is_none());
    assert_eq!(response.message.as_deref(), Some("provider 25 not found"));
}

#[tokio::test]
async fn test_search_by_service_ignores_case() {
    let state = state_with(SAMPLE);

    let response = search_by_service(State(state), Path("PLOMERO".to_string()))
        .await
        .expect("search")
        .0;

    assert_eq!(response.total_found, 2);
    assert_eq!(sorted_ids(&response.results), vec![10, 20]);
}

#[tokio::test]
async fn test_search_by_location_ignores_case() {
    let state = state_with(SAMPLE);

    let response = search_by_location(State(state), Path("LIMA".to_string()))
        .await
        .expect("search")
        .0;

    assert_eq!(response.total_found, 2);
    assert_eq!(sorted_ids(&response.results), vec![10, 30]);
}

#[tokio::test]
async fn test_search_with_no_matches() {
    let state = state_with(SAMPLE);

    let response = search_by_service(State(state), Path("Soldador".to_string()))
        .await
        .expect("search")
        .0;

    assert_eq!(response.total_found, 0);
    assert!(response.results.is_empty());
}
