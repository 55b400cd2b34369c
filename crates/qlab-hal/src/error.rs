use thiserror::Error;

/// Failures at the backend boundary.
///
/// Nothing here is retried locally: each variant is reported to the caller
/// as it happened.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// Credentials or instance settings are missing or malformed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The remote service rejected the credentials.
    #[error("authentication rejected: {0}")]
    AuthenticationFailed(String),

    /// No device could take the job.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("circuit rejected: {0}")]
    InvalidCircuit(String),

    #[error("circuit does not fit the backend: {0}")]
    CircuitTooLarge(String),

    #[error("invalid shot count {0}")]
    InvalidShots(String),

    #[error("submission rejected: {0}")]
    SubmissionFailed(String),

    /// Terminal failure reported by the backend, reason verbatim.
    #[error("job failed: {0}")]
    JobFailed(String),

    #[error("job was cancelled")]
    JobCancelled,

    #[error("unknown job {0}")]
    JobNotFound(String),

    /// The wait policy ran out before the job finished. Carries the job id.
    #[error("gave up waiting for job {0}")]
    Timeout(String),

    #[error(transparent)]
    Network(#[from] reqwest::Error),

    #[error("malformed payload: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Anything else the backend reported.
    #[error("backend error: {0}")]
    Backend(String),
}

impl HalError {
    /// Needs operator action before a retry can succeed.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            HalError::Configuration(_) | HalError::AuthenticationFailed(_)
        )
    }
}

impl From<qlab_ir::IrError> for HalError {
    fn from(err: qlab_ir::IrError) -> Self {
        HalError::InvalidCircuit(err.to_string())
    }
}

pub type HalResult<T> = Result<T, HalError>;
