//! Common helpers for end-to-end tests.

use std::sync::{Arc, RwLock};

use tokio::net::TcpListener;

use crate::directory::ProviderDirectory;
use crate::http::{AppState, SharedDirectory, router};
use crate::testing::new_provider;

/// Minimum degree used by end-to-end tests. Small so a handful of
/// providers already produces a multi-level tree.
pub const TEST_DEGREE: usize = 2;

/// Provider rows used to pre-populate a directory.
pub type Row<'a> = (i64, &'a str, &'a str, f64, &'a str);

/// A directory pre-populated with `rows`.
pub fn shared_directory(rows: &[Row<'_>]) -> SharedDirectory {
    let mut directory = ProviderDirectory::new(TEST_DEGREE).expect("create directory");
    for &(id, name, service, rating, location) in rows {
        directory
            .add(new_provider(id, name, service, rating, location))
            .expect("add provider");
    }
    Arc::new(RwLock::new(directory))
}

/// Handler state over a pre-populated directory.
pub fn state_with(rows: &[Row<'_>]) -> AppState {
    AppState::new(shared_directory(rows))
}

/// Providers used by most scenarios.
pub const SAMPLE: &[Row<'static>] = &[
    (10, "Ana Torres", "Plomero", 4.5, "Lima"),
    (20, "beto Ruiz", "plomero", 3.0, "Cusco"),
    (30, "Carla Diaz", "Electricista", 5.0, "lima"),
    (40, "Dario Paz", "Pintor", 2.5, "Arequipa"),
    (50, "elena Vega", "Electricista", 4.0, "Cusco"),
];

/// Status and decoded JSON body of a response.
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    body: serde_json::Value,
}

impl HttpResponse {
    async fn read(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let body = response
            .json::<serde_json::Value>()
            .await
            .expect("response body should be JSON");
        Self { status, body }
    }

    /// The JSON body.
    pub fn json(&self) -> serde_json::Value {
        self.body.clone()
    }
}

/// A directory server running on an ephemeral local port.
pub struct TestServer {
    base_url: String,
    client: reqwest::Client,
    pub directory: SharedDirectory,
}

impl TestServer {
    /// Start a server over a directory pre-populated with `rows`.
    pub async fn start(rows: &[Row<'_>]) -> Self {
        let directory = shared_directory(rows);
        let app = router(AppState::new(Arc::clone(&directory)));

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        Self {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
            directory,
        }
    }

    pub async fn get(&self, path: &str) -> HttpResponse {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("send request");
        HttpResponse::read(response).await
    }

    /// POST a raw body as `application/json`.
    pub async fn post(&self, path: &str, body: &str) -> HttpResponse {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_string())
            .send()
            .await
            .expect("send request");
        HttpResponse::read(response).await
    }
}

/// Sorted ids of a list of providers.
pub fn sorted_ids(providers: &[crate::types::Provider]) -> Vec<i64> {
    let mut ids: Vec<i64> = providers.iter().map(|p| p.id).collect();
    ids.sort_unstable();
    ids
}
