//! Configuration and shared state handed to every handler.

use std::net::SocketAddr;
use std::sync::Arc;

use qlab_hal::BackendSelector;
use qlab_primitives::{DEFAULT_SEED, DatasetCatalog, HardwareOptions};

/// Environment variable for the bind address.
pub const BIND_VAR: &str = "QLAB_BIND";

/// Environment variable for the dataset seed.
pub const DATASET_SEED_VAR: &str = "QLAB_DATASET_SEED";

/// Server settings, filled from defaults, environment and CLI flags.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Listen address.
    pub bind_address: SocketAddr,
    /// Seed for the demo dataset catalog.
    pub dataset_seed: u64,
    /// Largest RNG width served by the simulator route.
    pub max_simulator_bits: u32,
    /// Transpile level, wait policy and credential for hardware RNG.
    pub hardware: HardwareOptions,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind_address: ([127, 0, 0, 1], 8000).into(),
            dataset_seed: DEFAULT_SEED,
            max_simulator_bits: 20,
            hardware: HardwareOptions::default(),
        }
    }
}

/// Read-only state behind an `Arc`, built once at startup.
pub struct AppState {
    pub config: DashboardConfig,
    /// Demo datasets, generated once at startup.
    pub catalog: DatasetCatalog,
    /// Picks the device for each hardware RNG request. `None` when the
    /// hardware service is not configured.
    pub hardware_selector: Option<Arc<dyn BackendSelector>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_config(DashboardConfig::default())
    }

    /// Generates the dataset catalog from `config.dataset_seed`.
    pub fn with_config(config: DashboardConfig) -> Self {
        let catalog = DatasetCatalog::with_seed(config.dataset_seed);
        Self {
            config,
            catalog,
            hardware_selector: None,
        }
    }

    /// Enable `POST /rng/hardware`.
    pub fn with_selector(mut self, selector: Arc<dyn BackendSelector>) -> Self {
        self.hardware_selector = Some(selector);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
