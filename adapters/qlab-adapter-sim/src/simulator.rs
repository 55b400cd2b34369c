//! In-process backend over the statevector kernel.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use tracing::{debug, instrument};
use uuid::Uuid;

use qlab_hal::{
    Backend, BackendAvailability, Capabilities, ExecutionResult, HalError, HalResult, JobId,
    JobRecord, JobStatus,
};
use qlab_ir::Circuit;

use crate::sampler::sample_counts;

/// Widest circuit the simulator accepts.
pub const MAX_QUBITS: u32 = 24;

/// [`Backend`] that samples circuits locally.
///
/// A job is simulated inside `submit`; by the time the id is returned its
/// record is already `Completed`.
pub struct SimulatorBackend {
    capabilities: Capabilities,
    jobs: Mutex<FxHashMap<JobId, JobRecord>>,
    rng: Mutex<StdRng>,
}

impl SimulatorBackend {
    /// Seeded from OS entropy.
    pub fn new() -> Self {
        Self::build(StdRng::from_entropy(), MAX_QUBITS)
    }

    /// Same seed, same shot sequence.
    pub fn with_seed(seed: u64) -> Self {
        Self::build(StdRng::seed_from_u64(seed), MAX_QUBITS)
    }

    /// Lower the qubit limit. Values above [`MAX_QUBITS`] are clamped.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self::build(StdRng::from_entropy(), max_qubits.min(MAX_QUBITS))
    }

    fn build(rng: StdRng, max_qubits: u32) -> Self {
        Self {
            capabilities: Capabilities::simulator(max_qubits),
            jobs: Mutex::new(FxHashMap::default()),
            rng: Mutex::new(rng),
        }
    }

    fn jobs(&self) -> MutexGuard<'_, FxHashMap<JobId, JobRecord>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Why `circuit` cannot run here, if it cannot.
    fn width_violation(&self, circuit: &Circuit) -> Option<String> {
        let limit = self.capabilities.num_qubits;
        (circuit.num_qubits() > limit as usize).then(|| {
            format!(
                "{} qubits requested, simulator limit is {limit}",
                circuit.num_qubits()
            )
        })
    }

    fn execute(&self, circuit: &Circuit, shots: u32) -> ExecutionResult {
        let started = Instant::now();
        let counts = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            sample_counts(circuit, shots, &mut *rng)
        };
        let elapsed = started.elapsed();
        debug!(
            qubits = circuit.num_qubits(),
            shots,
            elapsed_us = elapsed.as_micros() as u64,
            "simulated"
        );

        ExecutionResult::new(counts, shots)
            .with_execution_time(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
            .with_backend(self.name())
    }

    fn check_shots(&self, shots: u32) -> HalResult<()> {
        let max = self.capabilities.max_shots;
        if (1..=max).contains(&shots) {
            Ok(())
        } else {
            Err(HalError::InvalidShots(format!("{shots} (allowed 1..={max})")))
        }
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.capabilities.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        Ok(BackendAvailability::always_available())
    }

    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        if let Some(reason) = self.width_violation(circuit) {
            return Err(HalError::CircuitTooLarge(reason));
        }
        self.check_shots(shots)?;

        let job_id = JobId::new(Uuid::new_v4().to_string());
        let mut record = JobRecord::queued(shots);
        record.transition(JobStatus::Running);
        record.complete(self.execute(circuit, shots));
        debug!(job = %job_id, shots, "job finished");

        self.jobs().insert(job_id.clone(), record);
        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        self.jobs()
            .get(job_id)
            .map(|record| record.status.clone())
            .ok_or_else(|| HalError::JobNotFound(job_id.to_string()))
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let jobs = self.jobs();
        let record = jobs
            .get(job_id)
            .ok_or_else(|| HalError::JobNotFound(job_id.to_string()))?;
        record
            .result
            .clone()
            .ok_or_else(|| HalError::JobNotFound(job_id.to_string()))
    }
}
