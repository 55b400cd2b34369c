//! API endpoint handlers.

pub mod datasets;
pub mod health;
pub mod rng;
