//! Error types for QASM emission.

use thiserror::Error;

/// Errors that can occur while emitting QASM.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EmitError {
    /// The instruction has no QASM 3 spelling.
    #[error("Cannot emit '{0}' as OpenQASM 3")]
    Unsupported(String),

    /// Writing to the output buffer failed.
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Result type for emission.
pub type EmitResult<T> = Result<T, EmitError>;
