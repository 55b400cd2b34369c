//! Random number endpoints.

use std::sync::Arc;

use axum::{Json, extract::State};
use tracing::info;

use qlab_primitives::{rng_hardware, rng_statevector};

use crate::dto::{HardwareRngResponse, RngRequest, SimulatorRngResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /rng/hardware - One random number from a real quantum device.
///
/// Also mounted at `/api/rng/hardware`.
pub async fn hardware(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RngRequest>,
) -> Result<Json<HardwareRngResponse>, ApiError> {
    let selector = state.hardware_selector.as_deref().ok_or_else(|| {
        ApiError::Configuration(
            "hardware backend not configured: set IBM_QUANTUM_API_KEY and IBM_SERVICE_CRN".into(),
        )
    })?;

    let sample = rng_hardware(request.num_bits, selector, &state.config.hardware).await?;
    info!(num_bits = sample.num_bits, "served hardware random number");
    Ok(Json(sample.into()))
}

/// POST /api/rng/simulator - One random number from the local simulator.
pub async fn simulator(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RngRequest>,
) -> Result<Json<SimulatorRngResponse>, ApiError> {
    let num_bits = request.num_bits;
    let max = state.config.max_simulator_bits;
    if num_bits > max {
        return Err(ApiError::BadRequest(format!(
            "num_bits must be at most {max}, got {num_bits}"
        )));
    }

    let (sample, circuit) = tokio::task::spawn_blocking(move || rng_statevector(num_bits))
        .await
        .map_err(|e| ApiError::Internal(format!("simulation task failed: {e}")))??;

    Ok(Json(SimulatorRngResponse {
        bitstring: sample.bitstring,
        value: sample.value,
        num_bits: sample.num_bits,
        circuit_depth: circuit.depth(),
    }))
}
