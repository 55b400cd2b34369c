//! IBM Quantum adapter for qlab.
//!
//! Runs native-gate circuits on IBM Quantum hardware through the Qiskit
//! Runtime REST API (SamplerV2) and picks the least busy device per request.
//!
//! # Authentication
//!
//! | Variable | Required | Meaning |
//! |----------|----------|---------|
//! | `IBM_QUANTUM_API_KEY` | yes | IBM Cloud API key, exchanged for an IAM token |
//! | `IBM_SERVICE_CRN` | yes | Qiskit Runtime service instance |
//! | `IBM_QUANTUM_ENDPOINT` | no | API base URL override |
//! | `IBM_IAM_URL` | no | IAM token endpoint override |
//!
//! Missing credentials are reported by [`IbmConfig::from_env`] before any
//! HTTP client is built.
//!
//! # Example
//!
//! ```ignore
//! use qlab_adapter_ibm::LeastBusySelector;
//! use qlab_hal::{BackendSelector, WaitPolicy};
//!
//! let selector = LeastBusySelector::from_env()?;
//! let handle = selector.select_backend().await?;
//! let job_id = handle.backend().submit(&transpiled, 1).await?;
//! let result = handle.backend().wait_with(&job_id, &WaitPolicy::hardware()).await?;
//! ```

mod api;
mod backend;
mod config;
mod error;
mod selector;

pub use api::{BackendInfo, BackendStatus, IbmClient};
pub use backend::IbmBackend;
pub use config::{
    DEFAULT_ENDPOINT, DEFAULT_IAM_URL, ENDPOINT_VAR, IAM_URL_VAR, IbmConfig, SERVICE_CRN_VAR,
};
pub use error::{IbmError, IbmResult};
pub use selector::{LeastBusySelector, least_busy};
