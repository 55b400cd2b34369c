//! Quantum primitives for qlab.
//!
//! Two small quantum workflows built on the qlab circuit stack:
//!
//! - **Random numbers** ([`rng`]): an N-qubit Hadamard circuit sampled once,
//!   either on the local statevector sampler or on a remote device chosen
//!   per request by a [`qlab_hal::BackendSelector`].
//! - **Correlation** ([`correlation`]): classical Pearson correlation next to
//!   ⟨Z⊗Z⟩ expectations of a two-qubit angle-encoded feature map, over the
//!   demo [`dataset`] catalog.
//!
//! # Example
//!
//! ```ignore
//! use qlab_primitives::{CorrelationReport, DatasetCatalog, DatasetKind, rng_statevector};
//!
//! let (sample, _circuit) = rng_statevector(8)?;
//! println!("{} = {}", sample.bitstring, sample.value);
//!
//! let catalog = DatasetCatalog::default();
//! let report = CorrelationReport::compute(catalog.get(DatasetKind::Positive))?;
//! println!("r = {:.3}, <ZZ> = {:.3}", report.pearson.r, report.mean_zz_entangled);
//! ```

pub mod correlation;
pub mod dataset;
pub mod encoding;
pub mod error;
pub mod rng;

pub use correlation::{
    CorrelationReport, Pearson, classical_corr, feature_map, pearson, quantum_zz,
};
pub use dataset::{DEFAULT_SEED, DataPoint, Dataset, DatasetCatalog, DatasetKind};
pub use encoding::{ANGLE_EPS, EncodingScale, angle_encode};
pub use error::{PrimitivesError, PrimitivesResult};
pub use rng::{
    HardwareOptions, MAX_HARDWARE_BITS, MAX_SIMULATED_BITS, RngSample, build_rng_circuit, rng_hardware,
    rng_statevector, rng_statevector_with_rng, transpile_for,
};
