//! HTTP JSON API over the provider directory.
//!
//! # Routes
//!
//! - `GET  /api/providers?sort=<key|name|rating|location>`: every provider, default by name
//! - `POST /api/providers`: add a provider
//! - `GET  /api/providers/{id}`: look up one provider
//! - `GET  /api/search/service/{service}`: providers by service type
//! - `GET  /api/search/location/{location}`: providers by location
//! - `GET  /api/statistics`: tree statistics and distributions
//! - `GET  /api/services`: distinct service types
//! - `GET  /api/locations`: distinct locations
//!
//! The directory is shared behind a single `RwLock`: lookups take the read
//! side, inserts take the write side.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::btree::Key;
use crate::directory::{DirectoryError, DirectoryStatistics, NewProvider, ProviderDirectory};
use crate::types::{ParseSortModeError, Provider, SortMode};

/// Directory shared between request handlers.
pub type SharedDirectory = Arc<RwLock<ProviderDirectory>>;

#[derive(Clone)]
pub struct AppState {
    directory: SharedDirectory,
}

impl AppState {
    #[must_use]
    pub const fn new(directory: SharedDirectory) -> Self {
        Self { directory }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, ProviderDirectory>, ApiError> {
        self.directory.read().map_err(|_| ApiError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, ProviderDirectory>, ApiError> {
        self.directory.write().map_err(|_| ApiError::LockPoisoned)
    }
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/providers", get(list_providers).post(add_provider))
        .route("/api/providers/{id}", get(find_provider))
        .route("/api/search/service/{service}", get(search_by_service))
        .route("/api/search/location/{location}", get(search_by_location))
        .route("/api/statistics", get(statistics))
        .route("/api/services", get(unique_services))
        .route("/api/locations", get(unique_locations))
        .with_state(state)
}

/// Errors surfaced to HTTP clients.
#[derive(Debug)]
pub enum ApiError {
    /// The request was well-formed JSON but broke a directory rule.
    Rejected(DirectoryError),
    /// Unknown `sort` query parameter.
    BadSortMode(ParseSortModeError),
    /// The body or path could not be extracted.
    BadRequest(String),
    /// The tree reported a broken record contract.
    Internal(DirectoryError),
    /// A handler panicked while holding the directory lock.
    LockPoisoned,
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Rejected(_) | Self::BadSortMode(_) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Internal(_) | Self::LockPoisoned => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(e) | Self::Internal(e) => write!(f, "{e}"),
            Self::BadSortMode(e) => write!(f, "{e}"),
            Self::BadRequest(message) => write!(f, "{message}"),
            Self::LockPoisoned => write!(f, "directory lock poisoned"),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<DirectoryError> for ApiError {
    fn from(e: DirectoryError) -> Self {
        match e {
            DirectoryError::Tree(_) => Self::Internal(e),
            _ => Self::Rejected(e),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {self}");
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
    pub sort: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct MessageBody {
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct LookupResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Provider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub found: bool,
    pub elapsed_ms: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct SearchResponse {
    pub results: Vec<Provider>,
    pub elapsed_ms: f64,
    pub total_found: usize,
}

pub async fn list_providers(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Provider>>, ApiError> {
    let sort_mode = match params.sort.as_deref() {
        Some(value) => value.parse::<SortMode>().map_err(ApiError::BadSortMode)?,
        None => SortMode::default(),
    };
    let providers = state.read()?.list(sort_mode)?;
    Ok(Json(providers))
}

pub async fn add_provider(
    State(state): State<AppState>,
    payload: Result<Json<NewProvider>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageBody>), ApiError> {
    let Json(new) = payload?;
    let id = state.write()?.add(new)?;
    Ok((
        StatusCode::CREATED,
        Json(MessageBody {
            message: format!("provider {id} added"),
        }),
    ))
}

pub async fn find_provider(
    State(state): State<AppState>,
    id: Result<Path<Key>, PathRejection>,
) -> Result<Json<LookupResponse>, ApiError> {
    let Path(id) = id?;
    let timed = state.read()?.find_by_id(id);
    let found = timed.value.is_some();
    Ok(Json(LookupResponse {
        message: (!found).then(|| format!("provider {id} not found")),
        result: timed.value,
        found,
        elapsed_ms: timed.elapsed_ms,
    }))
}

pub async fn search_by_service(
    State(state): State<AppState>,
    Path(service): Path<String>,
) -> Result<Json<SearchResponse>, ApiError> {
    let timed = state.read()?.find_by_service(&service)?;
    Ok(Json(SearchResponse {
        total_found: timed.value.len(),
        results: timed.value,
        elapsed_ms: timed.elapsed_ms,
    }))
}

pub async fn search_by_location(
    State(state): State<AppState>,
    Path(location): Path<String>,
) -> Result<Json<SearchResponse>, ApiError> {
    let timed = state.read()?.find_by_location(&location)?;
    Ok(Json(SearchResponse {
        total_found: timed.value.len(),
        results: timed.value,
        elapsed_ms: timed.elapsed_ms,
    }))
}

pub async fn statistics(
    State(state): State<AppState>,
) -> Result<Json<DirectoryStatistics>, ApiError> {
    Ok(Json(state.read()?.statistics()))
}

pub async fn unique_services(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.read()?.unique_services()))
}

pub async fn unique_locations(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.read()?.unique_locations()))
}
