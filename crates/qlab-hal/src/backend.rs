//! The [`Backend`] trait and the polling loop shared by every backend.
//!
//! A job goes through `submit` → `status` (repeated) → `result`. Callers
//! normally use [`Backend::wait_with`] instead of polling by hand.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::debug;

use qlab_ir::Circuit;

use crate::capability::Capabilities;
use crate::error::{HalError, HalResult};
use crate::job::{JobId, JobStatus};
use crate::result::ExecutionResult;

/// Poll cadence and deadline for [`Backend::wait_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitPolicy {
    pub poll_interval: Duration,
    /// Total time before [`HalError::Timeout`].
    pub timeout: Duration,
}

impl WaitPolicy {
    pub fn new(poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            poll_interval,
            timeout,
        }
    }

    /// Remote hardware queues: every 2 s, for up to 30 min.
    pub fn hardware() -> Self {
        Self::new(Duration::from_secs(2), Duration::from_secs(30 * 60))
    }
}

impl Default for WaitPolicy {
    /// Every 500 ms, for up to 5 min.
    fn default() -> Self {
        Self::new(Duration::from_millis(500), Duration::from_secs(300))
    }
}

/// A device or simulator that runs circuits.
///
/// `capabilities()` is cached at construction and never fails. A job id
/// returned by `submit()` starts out `Queued`; `result()` only succeeds once
/// the job reports `Completed`.
#[async_trait]
pub trait Backend: Send + Sync {
    fn name(&self) -> &str;

    fn capabilities(&self) -> &Capabilities;

    /// Whether the backend takes jobs right now, with queue depth if known.
    async fn availability(&self) -> HalResult<BackendAvailability>;

    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId>;

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus>;

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult>;

    async fn wait(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        self.wait_with(job_id, &WaitPolicy::default()).await
    }

    /// Poll until the job is terminal or the policy deadline passes.
    ///
    /// The status is always checked at least once. Failure and cancellation
    /// come back as errors; nothing is retried.
    async fn wait_with(&self, job_id: &JobId, policy: &WaitPolicy) -> HalResult<ExecutionResult> {
        let deadline = Instant::now() + policy.timeout;
        let mut polls = 0u32;
        loop {
            polls += 1;
            match self.status(job_id).await? {
                JobStatus::Completed => return self.result(job_id).await,
                JobStatus::Failed(reason) => return Err(HalError::JobFailed(reason)),
                JobStatus::Cancelled => return Err(HalError::JobCancelled),
                JobStatus::Queued | JobStatus::Running if Instant::now() >= deadline => {
                    return Err(HalError::Timeout(job_id.to_string()));
                }
                pending => {
                    debug!(%job_id, status = pending.label(), polls, "job pending");
                    tokio::time::sleep(policy.poll_interval).await;
                }
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendAvailability {
    pub is_available: bool,
    /// Pending jobs ahead of a new submission, when the backend reports it.
    pub queue_depth: Option<u32>,
    pub status_message: Option<String>,
}

impl BackendAvailability {
    /// Local backends: open, empty queue.
    pub fn always_available() -> Self {
        Self {
            is_available: true,
            queue_depth: Some(0),
            status_message: None,
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            is_available: false,
            queue_depth: None,
            status_message: Some(reason.into()),
        }
    }
}
