//! CLI command implementations.

pub mod backends;
pub mod correlate;
pub mod datasets;
pub mod rng;
pub mod version;
