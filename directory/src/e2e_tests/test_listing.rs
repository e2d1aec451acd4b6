//! Test ordered listing through the GET handler.

use axum::extract::{Query, State};
use axum::http::StatusCode;

use crate::e2e_tests::helpers::*;
use crate::http::{ListParams, list_providers};

async fn list_ids(sort: Option<&str>) -> Vec<i64> {
    let params = ListParams {
        sort: sort.map(str::to_string),
    };
    list_providers(State(state_with(SAMPLE)), Query(params))
        .await
        .expect("list")
        .0
        .iter()
        .map(|p| p.id)
        .collect()
}

#[tokio::test]
async fn test_list_defaults_to_name_order() {
    assert_eq!(list_ids(None).await, vec![10, 20, 30, 40, 50]);
}

#[tokio::test]
async fn test_list_by_key() {
    assert_eq!(list_ids(Some("key")).await, vec![10, 20, 30, 40, 50]);
}

#[tokio::test]
async fn test_list_by_rating_descending() {
    assert_eq!(list_ids(Some("rating")).await, vec![30, 10, 50, 20, 40]);
}

#[tokio::test]
async fn test_list_by_location() {
    // Arequipa, Cusco (20, 50), Lima (10, 30) with ties in id order
    assert_eq!(list_ids(Some("location")).await, vec![40, 20, 50, 10, 30]);
}

#[tokio::test]
async fn test_list_unknown_sort_mode() {
    let params = ListParams {
        sort: Some("price".to_string()),
    };
    let err = list_providers(State(state_with(SAMPLE)), Query(params))
        .await
        .unwrap_err();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}
