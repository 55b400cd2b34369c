//! Job identifiers and lifecycle.
//!
//! A job moves `Queued → Running → Completed`, or stops early in `Failed`
//! or `Cancelled`. Terminal states are final.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::result::ExecutionResult;

/// Backend-assigned job identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for JobId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Where a job is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    /// Carries the backend's failure reason verbatim.
    Failed(String),
    Cancelled,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Queued | JobStatus::Running)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, JobStatus::Completed)
    }

    /// Lowercase state name without the failure reason.
    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed(_) => "failed",
            JobStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Failed(reason) => write!(f, "failed ({reason})"),
            other => f.write_str(other.label()),
        }
    }
}

/// Local bookkeeping for a job a backend runs itself.
#[derive(Debug, Clone)]
pub struct JobRecord {
    pub status: JobStatus,
    pub shots: u32,
    pub submitted_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub result: Option<ExecutionResult>,
}

impl JobRecord {
    /// A freshly queued job.
    pub fn queued(shots: u32) -> Self {
        Self {
            status: JobStatus::Queued,
            shots,
            submitted_at: Utc::now(),
            finished_at: None,
            result: None,
        }
    }

    /// Move to `status`. Returns `false` and leaves the record untouched
    /// when the job is already terminal.
    pub fn transition(&mut self, status: JobStatus) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        if status.is_terminal() {
            self.finished_at = Some(Utc::now());
        }
        self.status = status;
        true
    }

    /// Store the result and mark the job completed.
    pub fn complete(&mut self, result: ExecutionResult) -> bool {
        let moved = self.transition(JobStatus::Completed);
        if moved {
            self.result = Some(result);
        }
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Counts;

    #[test]
    fn test_terminal_states() {
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed("calibration".into()).is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_display_keeps_failure_reason() {
        assert_eq!(JobStatus::Running.to_string(), "running");
        assert_eq!(
            JobStatus::Failed("calibration in progress".into()).to_string(),
            "failed (calibration in progress)"
        );
    }

    #[test]
    fn test_status_json_shape() {
        let failed = serde_json::to_value(JobStatus::Failed("boom".into())).unwrap();
        assert_eq!(failed, serde_json::json!({"state": "failed", "reason": "boom"}));
        let queued = serde_json::to_value(JobStatus::Queued).unwrap();
        assert_eq!(queued, serde_json::json!({"state": "queued"}));
        assert_eq!(serde_json::to_value(JobId::from("j-1")).unwrap(), "j-1");
    }

    #[test]
    fn test_record_terminal_is_final() {
        let mut record = JobRecord::queued(1);
        assert!(record.finished_at.is_none());

        assert!(record.transition(JobStatus::Cancelled));
        assert!(record.finished_at.is_some());

        assert!(!record.complete(ExecutionResult::new(Counts::new(), 1)));
        assert_eq!(record.status, JobStatus::Cancelled);
        assert!(record.result.is_none());
    }

    #[test]
    fn test_record_complete_stores_result() {
        let mut record = JobRecord::queued(4);
        assert!(record.transition(JobStatus::Running));
        assert!(record.complete(ExecutionResult::new(Counts::new(), 4)));
        assert!(record.status.is_success());
        assert_eq!(record.result.as_ref().map(|r| r.shots), Some(4));
    }
}
