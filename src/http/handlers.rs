//! Endpoint handlers.
//!
//! Each handler makes exactly one upstream call and either relays the upstream
//! JSON body with status 200 or returns an [`ApiError`].

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, QueryRejection},
        Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::IgnoredAny, Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::observability::metrics;
use crate::upstream::{DocumentStore, StatsApi, UpstreamClient, UpstreamError};

const STATS_ERROR: &str = "Hypixel Error";
const STORE_READ_ERROR: &str = "JSONBin Read Error";
const STORE_WRITE_ERROR: &str = "JSONBin Write Error";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: UpstreamClient,
    pub stats: Arc<StatsApi>,
    pub store: Arc<DocumentStore>,
}

#[derive(Debug, Deserialize)]
pub struct GuildQuery {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct PlayerQuery {
    #[serde(default)]
    pub uuid: String,
}

#[derive(Debug, Deserialize)]
pub struct BinQuery {
    #[serde(default)]
    pub id: String,
}

#[derive(Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn get_health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn get_guild(
    State(state): State<AppState>,
    query: Result<Query<GuildQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let query = query_params(query)?;
    relay("guild", STATS_ERROR, state.stats.guild(&state.client, &query.name)).await
}

pub async fn get_player(
    State(state): State<AppState>,
    query: Result<Query<PlayerQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let query = query_params(query)?;
    relay("player", STATS_ERROR, state.stats.player(&state.client, &query.uuid)).await
}

pub async fn read_bin(
    State(state): State<AppState>,
    query: Result<Query<BinQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let query = query_params(query)?;
    relay("jsonbin_read", STORE_READ_ERROR, state.store.read(&state.client, &query.id)).await
}

pub async fn write_bin(
    State(state): State<AppState>,
    query: Result<Query<BinQuery>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let query = query_params(query)?;
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(rejection.body_text())
        } else {
            ApiError::BadRequest {
                error: "Invalid request body",
                detail: rejection.body_text(),
            }
        }
    })?;
    if let Err(e) = serde_json::from_slice::<IgnoredAny>(&body) {
        tracing::debug!(error = %e, "Rejected write with malformed JSON body");
        return Err(ApiError::BadRequest {
            error: "Invalid JSON body",
            detail: e.to_string(),
        });
    }

    relay(
        "jsonbin_write",
        STORE_WRITE_ERROR,
        state.store.write(&state.client, &query.id, body),
    )
    .await
}

/// Unwrap the query extractor, turning a malformed query string into the JSON envelope.
fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    match query {
        Ok(Query(params)) => Ok(params),
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "Rejected malformed query string");
            Err(ApiError::BadRequest {
                error: "Invalid query string",
                detail: rejection.body_text(),
            })
        }
    }
}

/// Await one upstream call and turn its outcome into a response.
async fn relay<F>(endpoint: &'static str, label: &'static str, call: F) -> Result<Response, ApiError>
where
    F: Future<Output = Result<Bytes, UpstreamError>>,
{
    let start = Instant::now();
    match call.await {
        Ok(body) => {
            metrics::record_request(endpoint, 200, start);
            tracing::debug!(
                endpoint,
                bytes = body.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Relayed upstream response"
            );
            Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
        }
        Err(source) => {
            metrics::record_request(endpoint, 500, start);
            tracing::error!(
                endpoint,
                upstream_status = ?source.upstream_status(),
                error = %source,
                "Upstream call failed"
            );
            Err(ApiError::Upstream { label, source })
        }
    }
}
