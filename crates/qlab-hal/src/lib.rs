//! Backend boundary for qlab.
//!
//! Everything that runs a circuit, whether the local statevector simulator
//! or an IBM device, sits behind the same async [`Backend`] trait.
//!
//! - [`Backend`]: the async job lifecycle (submit, status, result, wait)
//! - [`Capabilities`]: qubit count, gate set and connectivity of a backend
//! - [`BackendSelector`]: picks a backend per request and returns a [`BackendHandle`]
//! - [`EnvTokenProvider`]: reads a credential from the process environment
//! - [`ExecutionResult`] and [`Counts`]: measurement outcomes
//!
//! | Adapter crate | Credentials |
//! |---------------|-------------|
//! | `qlab-adapter-sim` | none |
//! | `qlab-adapter-ibm` | `IBM_QUANTUM_API_KEY`, `IBM_SERVICE_CRN` |
//!
//! # Example
//!
//! ```ignore
//! use qlab_hal::Backend;
//! use qlab_adapter_sim::SimulatorBackend;
//! use qlab_ir::Circuit;
//!
//! let mut circuit = Circuit::with_size("rng", 4, 0);
//! circuit.h_all()?.measure_all()?;
//!
//! let backend = SimulatorBackend::new();
//! let job_id = backend.submit(&circuit, 1).await?;
//! let result = backend.wait(&job_id).await?;
//! let (bitstring, _) = result.counts.most_frequent().unwrap();
//! ```

pub mod auth;
pub mod backend;
pub mod capability;
pub mod error;
pub mod job;
pub mod result;
pub mod selector;

pub use auth::EnvTokenProvider;
pub use backend::{Backend, BackendAvailability, WaitPolicy};
pub use capability::{Capabilities, GateSet, Topology, TopologyKind};
pub use error::{HalError, HalResult};
pub use job::{JobId, JobRecord, JobStatus};
pub use result::{Counts, ExecutionResult};
pub use selector::{BackendHandle, BackendSelector, FixedSelector};
