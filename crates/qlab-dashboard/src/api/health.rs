//! Liveness probe.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::dto::HealthResponse;
use crate::state::AppState;

/// `GET /api/health`. Also reports whether hardware RNG is wired up.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let hardware = state.hardware_selector.is_some();
    Json(HealthResponse::new(hardware))
}
