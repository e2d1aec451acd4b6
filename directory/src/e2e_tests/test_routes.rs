//! Test the router over a real TCP connection.

use crate::e2e_tests::helpers::*;

#[tokio::test]
async fn test_post_then_get() {
    let server = TestServer::start(&[]).await;

    let created = server
        .post(
            "/api/providers",
            r#"{"id": 5, "name": "Ana", "service_type": "Plomero", "rating": 4, "location": "Lima"}"#,
        )
        .await;
    assert_eq!(created.status, 201);
    assert_eq!(created.json()["message"], "provider 5 added");

    let found = server.get("/api/providers/5").await;
    assert_eq!(found.status, 200);
    let body = found.json();
    assert_eq!(body["found"], true);
    assert_eq!(body["result"]["name"], "Ana");
    assert_eq!(body["result"]["location"], "Lima");
    assert!(body["elapsed_ms"].is_number());
}

#[tokio::test]
async fn test_post_duplicate_returns_bad_request() {
    let server = TestServer::start(SAMPLE).await;

    let response = server
        .post(
            "/api/providers",
            r#"{"id": 10, "name": "X", "service_type": "Y", "rating": 3, "location": "Z"}"#,
        )
        .await;
    assert_eq!(response.status, 400);
    assert_eq!(response.json()["error"], "provider id 10 already exists");
}

#[tokio::test]
async fn test_post_missing_field_returns_bad_request() {
    let server = TestServer::start(&[]).await;

    let response = server
        .post("/api/providers", r#"{"id": 1, "name": "X", "service_type": "Y"}"#)
        .await;
    assert_eq!(response.status, 400);
    assert_eq!(response.json()["error"], "missing required field: rating");
}

#[tokio::test]
async fn test_post_wrong_field_type_returns_json_error() {
    let server = TestServer::start(&[]).await;

    let response = server
        .post(
            "/api/providers",
            r#"{"id": 1, "name": "X", "service_type": "Y", "rating": "five", "location": "Z"}"#,
        )
        .await;
    assert_eq!(response.status, 400);
    let error = response.json()["error"].as_str().map(str::to_string);
    assert!(error.is_some_and(|e| e.contains("rating")));

    let directory = server.directory.read().expect("lock");
    assert!(directory.is_empty());
}

#[tokio::test]
async fn test_post_truncated_body_returns_json_error() {
    let server = TestServer::start(&[]).await;

    let response = server.post("/api/providers", r#"{"id": 1,"#).await;
    assert_eq!(response.status, 400);
    assert!(response.json()["error"].is_string());
}

#[tokio::test]
async fn test_get_non_numeric_id_returns_json_error() {
    let server = TestServer::start(SAMPLE).await;

    let response = server.get("/api/providers/abc").await;
    assert_eq!(response.status, 400);
    assert!(response.json()["error"].is_string());
}

#[tokio::test]
async fn test_get_missing_provider() {
    let server = TestServer::start(SAMPLE).await;

    let response = server.get("/api/providers/999").await;
    assert_eq!(response.status, 200);
    let body = response.json();
    assert_eq!(body["found"], false);
    assert!(body.get("result").is_none());
}

#[tokio::test]
async fn test_search_routes() {
    let server = TestServer::start(SAMPLE).await;

    let by_service = server.get("/api/search/service/electricista").await.json();
    assert_eq!(by_service["total_found"], 2);

    let by_location = server.get("/api/search/location/cusco").await.json();
    assert_eq!(by_location["total_found"], 2);
}

#[tokio::test]
async fn test_list_and_statistics_routes() {
    let server = TestServer::start(SAMPLE).await;

    let listed = server.get("/api/providers?sort=rating").await.json();
    let first_id = listed[0]["id"].as_i64();
    assert_eq!(first_id, Some(30));

    let bad = server.get("/api/providers?sort=price").await;
    assert_eq!(bad.status, 400);

    let stats = server.get("/api/statistics").await.json();
    assert_eq!(stats["total_records"], 5);
    assert_eq!(stats["minimum_degree"], TEST_DEGREE);
    assert_eq!(stats["services"]["Electricista"], 2);

    let services = server.get("/api/services").await.json();
    assert_eq!(services.as_array().map(Vec::len), Some(4));
    let locations = server.get("/api/locations").await.json();
    assert_eq!(locations[0], "Arequipa");
}

#[tokio::test]
async fn test_concurrent_readers_and_writer() {
    let server = std::sync::Arc::new(TestServer::start(&[]).await);

    let mut handles = Vec::new();
    for id in 0..20 {
        let server = std::sync::Arc::clone(&server);
        handles.push(tokio::spawn(async move {
            let body = format!(
                r#"{{"id": {id}, "name": "p{id}", "service_type": "Plomero", "rating": 3, "location": "Lima"}}"#
            );
            server.post("/api/providers", &body).await.status
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.expect("join"), 201);
    }

    let directory = server.directory.read().expect("lock");
    assert_eq!(directory.len(), 20);
    assert_eq!(directory.unique_services(), vec!["Plomero"]);
}
