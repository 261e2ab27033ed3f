//! `GET /health`, public

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::RepositoryProvider;

#[derive(Clone)]
pub struct HealthState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub started_at: Arc<Instant>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Degraded,
    Error,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: Status,
    pub version: String,
    pub uptime_seconds: u64,
    pub database: StoreHealth,
}

/// Result of one round-trip to the record store
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreHealth {
    pub status: Status,
    pub latency_ms: Option<u64>,
}

async fn probe_store(repos: &dyn RepositoryProvider) -> StoreHealth {
    let started = Instant::now();
    match repos.ping().await {
        Ok(()) => StoreHealth {
            status: Status::Ok,
            latency_ms: Some(started.elapsed().as_millis() as u64),
        },
        Err(e) => {
            tracing::warn!(error = %e, "Health check: store unreachable");
            StoreHealth {
                status: Status::Error,
                latency_ms: None,
            }
        }
    }
}

/// 200 while the store answers, 503 otherwise. The body has the same shape
/// either way.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Record store unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let database = probe_store(state.repos.as_ref()).await;
    let (code, status) = match database.status {
        Status::Ok => (StatusCode::OK, Status::Ok),
        _ => (StatusCode::SERVICE_UNAVAILABLE, Status::Degraded),
    };

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: state.started_at.elapsed().as_secs(),
            database,
        }),
    )
}
