//! Data Transfer Objects for the dashboard API.
//!
//! These types bridge qlab primitives to JSON-serializable API responses.

use serde::{Deserialize, Serialize};

use qlab_primitives::{CorrelationReport, DataPoint, Dataset, DatasetKind, RngSample};

// ============================================================================
// RNG DTOs
// ============================================================================

/// Request body for both RNG routes.
#[derive(Debug, Deserialize)]
pub struct RngRequest {
    /// Number of random bits (one qubit each).
    pub num_bits: u32,
}

/// Response of `POST /rng/hardware`.
#[derive(Debug, Serialize)]
pub struct HardwareRngResponse {
    pub bitstring: String,
    pub value: u64,
}

impl From<RngSample> for HardwareRngResponse {
    fn from(sample: RngSample) -> Self {
        Self {
            bitstring: sample.bitstring,
            value: sample.value,
        }
    }
}

/// Response of `POST /api/rng/simulator`.
#[derive(Debug, Serialize)]
pub struct SimulatorRngResponse {
    pub bitstring: String,
    pub value: u64,
    pub num_bits: u32,
    /// Depth of the sampled circuit, measurement included.
    pub circuit_depth: usize,
}

// ============================================================================
// Dataset DTOs
// ============================================================================

/// Scatter plot color for a dataset.
pub fn plot_color(kind: DatasetKind) -> &'static str {
    match kind {
        DatasetKind::Positive => "#1f77b4",
        DatasetKind::Negative => "#d62728",
        DatasetKind::Uncorrelated => "#7f7f7f",
        DatasetKind::XorHealth => "#2ca02c",
    }
}

/// Entry in `GET /api/datasets`.
#[derive(Debug, Serialize)]
pub struct DatasetSummary {
    pub name: String,
    pub slug: String,
    pub size: usize,
    pub color: String,
}

impl From<&Dataset> for DatasetSummary {
    fn from(dataset: &Dataset) -> Self {
        Self {
            name: dataset.name.clone(),
            slug: dataset.kind.slug().to_string(),
            size: dataset.len(),
            color: plot_color(dataset.kind).to_string(),
        }
    }
}

/// Response of `GET /api/datasets/{slug}`.
#[derive(Debug, Serialize)]
pub struct DatasetDetails {
    pub name: String,
    pub slug: String,
    pub color: String,
    pub points: Vec<DataPoint>,
    /// `[min, max]` of height.
    pub x_range: Option<(f64, f64)>,
    /// `[min, max]` of weight.
    pub y_range: Option<(f64, f64)>,
}

impl From<&Dataset> for DatasetDetails {
    fn from(dataset: &Dataset) -> Self {
        Self {
            name: dataset.name.clone(),
            slug: dataset.kind.slug().to_string(),
            color: plot_color(dataset.kind).to_string(),
            points: dataset.points.clone(),
            x_range: dataset.x_range(),
            y_range: dataset.y_range(),
        }
    }
}

/// Response of `GET /api/datasets/{slug}/correlation`.
#[derive(Debug, Serialize)]
pub struct CorrelationResponse {
    #[serde(flatten)]
    pub report: CorrelationReport,
    pub slug: String,
    pub color: String,
    pub points: Vec<DataPoint>,
}

// ============================================================================
// Health DTO
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status (always "ok" if responding).
    pub status: String,
    /// Dashboard version.
    pub version: String,
    /// Whether a hardware backend selector is configured.
    pub hardware_configured: bool,
}

impl HealthResponse {
    pub fn new(hardware_configured: bool) -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            hardware_configured,
        }
    }
}
