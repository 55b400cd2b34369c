//! qlab local statevector simulator.
//!
//! Three entry points share one statevector engine:
//!
//! - [`SimulatorBackend`] implements [`qlab_hal::Backend`] and samples
//!   measurement shots, so it can stand in wherever a hardware backend is
//!   expected (tests, the CLI `--backend simulator`).
//! - [`Sampler`] samples synchronously from a caller-owned random source.
//! - [`Estimator`] returns exact Pauli-Z expectation values without any
//!   sampling noise. The correlation primitives use it for ⟨Z⊗Z⟩.
//!
//! # Memory
//!
//! | Qubits | Memory |
//! |--------|--------|
//! | 10 | ~16 KB |
//! | 20 | ~16 MB |
//! | 24 | ~256 MB |
//!
//! Circuits wider than [`MAX_QUBITS`] are rejected with
//! [`qlab_hal::HalError::CircuitTooLarge`].
//!
//! # Example
//!
//! ```ignore
//! use qlab_adapter_sim::SimulatorBackend;
//! use qlab_hal::Backend;
//! use qlab_ir::Circuit;
//!
//! let backend = SimulatorBackend::with_seed(7);
//! let mut circuit = Circuit::with_size("rng", 4, 0);
//! circuit.h_all()?.measure_all()?;
//! let job = backend.submit(&circuit, 1).await?;
//! let result = backend.wait(&job).await?;
//! ```

mod estimator;
mod sampler;
mod simulator;
mod statevector;

pub use estimator::Estimator;
pub use sampler::Sampler;
pub use simulator::{MAX_QUBITS, SimulatorBackend};
