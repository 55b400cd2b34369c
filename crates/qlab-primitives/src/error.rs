//! Error types for the primitives.

use qlab_compile::CompileError;
use qlab_hal::HalError;
use qlab_ir::IrError;
use thiserror::Error;

/// Result type for primitive operations.
pub type PrimitivesResult<T> = Result<T, PrimitivesError>;

/// Errors raised by the RNG and correlation primitives.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PrimitivesError {
    /// Missing or rejected credential. Needs operator action, never retried.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Backend selection, submission or the remote job failed.
    #[error("Remote execution failed: {0}")]
    Remote(#[source] HalError),

    /// The request itself cannot be served.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Circuit construction or transpilation failed.
    #[error("Circuit error: {0}")]
    Circuit(String),
}

impl PrimitivesError {
    /// True when the error needs operator action before a retry can succeed.
    pub fn is_configuration(&self) -> bool {
        matches!(self, PrimitivesError::Configuration(_))
    }
}

impl From<HalError> for PrimitivesError {
    fn from(err: HalError) -> Self {
        if err.is_configuration() {
            PrimitivesError::Configuration(err.to_string())
        } else {
            PrimitivesError::Remote(err)
        }
    }
}

impl From<IrError> for PrimitivesError {
    fn from(err: IrError) -> Self {
        PrimitivesError::Circuit(err.to_string())
    }
}

impl From<CompileError> for PrimitivesError {
    fn from(err: CompileError) -> Self {
        PrimitivesError::Circuit(err.to_string())
    }
}
