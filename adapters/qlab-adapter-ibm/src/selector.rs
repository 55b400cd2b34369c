//! Least-busy backend selection.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use qlab_hal::{BackendHandle, BackendSelector, HalError, HalResult};

use crate::api::{BackendInfo, IbmClient};
use crate::backend::IbmBackend;
use crate::config::IbmConfig;
use crate::error::IbmResult;

/// Picks the operational, non-simulator device with the shortest queue.
///
/// Every call re-authenticates and re-lists the fleet. Nothing about the
/// chosen device is cached between calls.
#[derive(Debug, Clone)]
pub struct LeastBusySelector {
    config: IbmConfig,
}

impl LeastBusySelector {
    /// Select from the fleet reachable with `config`.
    pub fn new(config: IbmConfig) -> Self {
        Self { config }
    }

    /// Build from the process environment. Fails without network I/O when a
    /// credential is missing.
    pub fn from_env() -> IbmResult<Self> {
        IbmConfig::from_env().map(Self::new)
    }

    pub fn config(&self) -> &IbmConfig {
        &self.config
    }
}

/// Choose the least busy candidate. Ties go to the alphabetically first name.
pub fn least_busy(backends: Vec<BackendInfo>) -> Option<BackendInfo> {
    backends
        .into_iter()
        .filter(|b| b.status.operational && !b.simulator)
        .min_by(|a, b| {
            a.status
                .pending_jobs
                .cmp(&b.status.pending_jobs)
                .then_with(|| a.name.cmp(&b.name))
        })
}

#[async_trait]
impl BackendSelector for LeastBusySelector {
    fn describe(&self) -> &str {
        "ibm-least-busy"
    }

    #[instrument(skip(self))]
    async fn select_backend(&self) -> HalResult<BackendHandle> {
        let client = Arc::new(IbmClient::connect(&self.config).await?);
        let backends = client.list_backends().await?;
        debug!(candidates = backends.len(), "fetched backend fleet");

        let chosen = least_busy(backends).ok_or_else(|| {
            HalError::BackendUnavailable("no operational IBM Quantum hardware backend".into())
        })?;
        let pending = chosen.status.pending_jobs;
        info!(backend = %chosen.name, pending_jobs = pending, "selected least busy backend");

        Ok(BackendHandle::new(Arc::new(IbmBackend::new(client, chosen))).with_queue_depth(pending))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::BackendStatus;

    fn device(name: &str, operational: bool, simulator: bool, pending: u32) -> BackendInfo {
        BackendInfo {
            name: name.into(),
            num_qubits: 133,
            basis_gates: vec!["cz".into(), "id".into(), "rz".into(), "sx".into(), "x".into()],
            coupling_map: vec![(0, 1)],
            simulator,
            max_shots: None,
            status: BackendStatus {
                operational,
                status_msg: None,
                pending_jobs: pending,
            },
        }
    }

    #[test]
    fn test_picks_shortest_queue() {
        let chosen = least_busy(vec![
            device("ibm_fez", true, false, 40),
            device("ibm_torino", true, false, 3),
            device("ibm_marrakesh", true, false, 17),
        ])
        .unwrap();
        assert_eq!(chosen.name, "ibm_torino");
    }

    #[test]
    fn test_skips_offline_and_simulators() {
        let chosen = least_busy(vec![
            device("ibm_fez", false, false, 0),
            device("simulator_stabilizer", true, true, 0),
            device("ibm_kyiv", true, false, 90),
        ])
        .unwrap();
        assert_eq!(chosen.name, "ibm_kyiv");
    }

    #[test]
    fn test_tie_broken_by_name() {
        let chosen = least_busy(vec![
            device("ibm_torino", true, false, 5),
            device("ibm_fez", true, false, 5),
        ])
        .unwrap();
        assert_eq!(chosen.name, "ibm_fez");
    }

    #[test]
    fn test_no_candidates() {
        assert!(least_busy(vec![]).is_none());
        assert!(least_busy(vec![device("ibm_fez", false, false, 0)]).is_none());
    }

    #[test]
    fn test_describe() {
        let selector = LeastBusySelector::new(IbmConfig::new("key", "crn"));
        assert_eq!(selector.describe(), "ibm-least-busy");
    }
}
