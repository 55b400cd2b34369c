//! qlab dashboard binary entry point.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qlab_adapter_ibm::LeastBusySelector;
use qlab_dashboard::state::{BIND_VAR, DATASET_SEED_VAR};
use qlab_dashboard::{AppState, DashboardConfig, create_router};
use qlab_primitives::HardwareOptions;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qlab_dashboard=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = DashboardConfig {
        hardware: HardwareOptions::from_env(),
        ..DashboardConfig::default()
    };
    if let Ok(bind) = std::env::var(BIND_VAR) {
        config.bind_address = bind
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {BIND_VAR} address '{bind}': {e}"))?;
    }
    if let Ok(seed) = std::env::var(DATASET_SEED_VAR) {
        config.dataset_seed = seed
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {DATASET_SEED_VAR} '{seed}': {e}"))?;
    }
    let bind_addr = config.bind_address;

    let mut state = AppState::with_config(config);
    match LeastBusySelector::from_env() {
        Ok(selector) => {
            tracing::info!("Hardware RNG enabled (least-busy IBM backend)");
            state = state.with_selector(Arc::new(selector));
        }
        Err(e) => tracing::warn!("Hardware RNG disabled: {e}"),
    }

    let app = create_router(Arc::new(state));

    tracing::info!("Starting qlab dashboard at http://{}", bind_addr);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
