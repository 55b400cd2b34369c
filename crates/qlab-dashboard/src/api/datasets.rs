//! Demo dataset and correlation endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};

use qlab_primitives::{CorrelationReport, Dataset};

use crate::dto::{CorrelationResponse, DatasetDetails, DatasetSummary, plot_color};
use crate::error::ApiError;
use crate::state::AppState;

fn find<'a>(state: &'a AppState, slug: &str) -> Result<&'a Dataset, ApiError> {
    state
        .catalog
        .by_name(slug)
        .ok_or_else(|| ApiError::NotFound(format!("no dataset named '{slug}'")))
}

/// GET /api/datasets - List the demo datasets.
pub async fn list_datasets(State(state): State<Arc<AppState>>) -> Json<Vec<DatasetSummary>> {
    Json(state.catalog.iter().map(DatasetSummary::from).collect())
}

/// GET /api/datasets/{slug} - Points of one dataset.
pub async fn get_dataset(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<DatasetDetails>, ApiError> {
    find(&state, &slug).map(|dataset| Json(DatasetDetails::from(dataset)))
}

/// GET /api/datasets/{slug}/correlation - Classical and quantum correlation.
pub async fn correlation(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<CorrelationResponse>, ApiError> {
    let dataset = find(&state, &slug)?;
    let report = CorrelationReport::compute(dataset)?;
    tracing::debug!(
        dataset = %dataset.name,
        r = report.pearson.r,
        zz = report.mean_zz_entangled,
        "computed correlation"
    );

    Ok(Json(CorrelationResponse {
        report,
        slug: dataset.kind.slug().to_string(),
        color: plot_color(dataset.kind).to_string(),
        points: dataset.points.clone(),
    }))
}
