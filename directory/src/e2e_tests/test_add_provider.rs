//! Test adding providers through the POST handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::directory::{DirectoryError, NewProvider};
use crate::e2e_tests::helpers::*;
use crate::http::{ApiError, add_provider};
use crate::testing::new_provider;

#[tokio::test]
async fn test_add_provider_created() {
    let state = state_with(&[]);

    let (status, Json(body)) = add_provider(
        State(state.clone()),
        Ok(Json(new_provider(7, "Ana", "Plomero", 4.0, "Lima"))),
    )
    .await
    .expect("add provider");

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.message, "provider 7 added");
}

#[tokio::test]
async fn test_add_provider_duplicate_id() {
    let state = state_with(SAMPLE);

    let err = add_provider(
        State(state),
        Ok(Json(new_provider(30, "Other", "Pintor", 3.0, "Lima"))),
    )
    .await
    .unwrap_err();

    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert!(matches!(
        err,
        ApiError::Rejected(DirectoryError::DuplicateId(30))
    ));
}

#[tokio::test]
async fn test_add_provider_missing_fields() {
    let state = state_with(&[]);
    let new = NewProvider {
        id: Some(1),
        name: Some("Ana".to_string()),
        ..NewProvider::default()
    };

    let err = add_provider(State(state), Ok(Json(new))).await.unwrap_err();

    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(err.to_string(), "missing required field: service_type");
}

#[tokio::test]
async fn test_add_provider_rating_out_of_range() {
    let state = state_with(&[]);

    let err = add_provider(
        State(state),
        Ok(Json(new_provider(1, "Ana", "Plomero", 6.0, "Lima"))),
    )
    .await
    .unwrap_err();

    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert!(matches!(
        err,
        ApiError::Rejected(DirectoryError::RatingOutOfRange(_))
    ));
}

#[tokio::test]
async fn test_add_many_providers_grows_tree() {
    let state = state_with(&[]);
    for id in 0..40 {
        let (status, _) = add_provider(
            State(state.clone()),
            Ok(Json(new_provider(id, "n", "Plomero", 3.0, "Lima"))),
        )
        .await
        .expect("add provider");
        assert_eq!(status, StatusCode::CREATED);
    }

    let stats = crate::http::statistics(State(state))
        .await
        .expect("statistics")
        .0;
    assert_eq!(stats.tree.total_records, 40);
    assert!(stats.tree.height >= 3);
}
