//! Health Routes
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health - Which datasets are present on disk

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::state::ServerState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub datasets: BTreeMap<String, bool>,
    pub uptime_seconds: u64,
    pub version: String,
}

/// GET /health/live
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health
///
/// `healthy` when every dataset file exists, `degraded` when some do,
/// `unhealthy` when none do. Always answers 200.
pub async fn full_health(State(state): State<Arc<ServerState>>) -> Json<HealthResponse> {
    let mut datasets = BTreeMap::new();
    for (dataset, path) in state.dataset_paths() {
        let present = tokio::fs::metadata(path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        datasets.insert(dataset.to_string(), present);
    }

    let present = datasets.values().filter(|p| **p).count();
    let status = if present == datasets.len() {
        "healthy"
    } else if present > 0 {
        "degraded"
    } else {
        "unhealthy"
    };

    Json(HealthResponse {
        status: status.to_string(),
        datasets,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
