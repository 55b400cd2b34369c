//! Error types for the IBM Quantum adapter.

use qlab_hal::HalError;
use thiserror::Error;

/// Result type for IBM operations.
pub type IbmResult<T> = Result<T, IbmError>;

/// Errors that can occur when talking to IBM Quantum.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IbmError {
    /// A required environment variable is unset or empty.
    #[error("IBM Quantum credential missing: set the {var} environment variable")]
    MissingCredential {
        /// Name of the variable.
        var: String,
    },

    /// The credential cannot be sent as an HTTP header.
    #[error("Invalid IBM Quantum credential: {0}")]
    InvalidCredential(String),

    /// IAM token exchange failed.
    #[error("IAM token exchange failed: {0}")]
    IamTokenExchange(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("IBM Quantum API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body or error message.
        message: String,
    },

    /// Job not found.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// Backend not found or offline.
    #[error("Backend not available: {0}")]
    BackendUnavailable(String),

    /// Result payload could not be turned into counts.
    #[error("Malformed job result: {0}")]
    MalformedResult(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Circuit could not be converted to OpenQASM.
    #[error("Circuit conversion error: {0}")]
    Circuit(String),
}

impl From<IbmError> for HalError {
    fn from(e: IbmError) -> Self {
        match e {
            IbmError::MissingCredential { .. } | IbmError::InvalidCredential(_) => {
                HalError::Configuration(e.to_string())
            }
            IbmError::IamTokenExchange(_) => HalError::AuthenticationFailed(e.to_string()),
            IbmError::Http(err) => HalError::Network(err),
            IbmError::JobNotFound(id) => HalError::JobNotFound(id),
            IbmError::BackendUnavailable(msg) => HalError::BackendUnavailable(msg),
            IbmError::Json(err) => HalError::Serialization(err),
            IbmError::Circuit(msg) => HalError::InvalidCircuit(msg),
            IbmError::Api { .. } | IbmError::MalformedResult(_) => {
                HalError::Backend(e.to_string())
            }
        }
    }
}
