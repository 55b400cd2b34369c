//! Web front end for qlab.
//!
//! Routes:
//!
//! - `POST /rng/hardware`: `{"num_bits": N}` in, `{"bitstring": "...", "value": V}`
//!   out, drawn on a device chosen by a [`qlab_hal::BackendSelector`]
//! - `/api/...`: demo datasets, classical vs quantum correlation, and
//!   simulator random numbers
//! - `/`: the bundled single-page UI
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use qlab_dashboard::{AppState, DashboardConfig, create_router};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = DashboardConfig::default();
//! let app = create_router(Arc::new(AppState::with_config(config.clone())));
//! let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod dto;
pub mod error;
pub mod server;
pub mod state;

pub use dto::{
    CorrelationResponse, DatasetDetails, DatasetSummary, HardwareRngResponse, HealthResponse,
    RngRequest, SimulatorRngResponse,
};
pub use error::ApiError;
pub use server::create_router;
pub use state::{AppState, DashboardConfig};
