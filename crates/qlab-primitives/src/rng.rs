//! Quantum random number generation.
//!
//! The RNG circuit is a Hadamard on every qubit followed by a full
//! measurement. It can be sampled locally with [`rng_statevector`] or run on
//! a backend picked per request with [`rng_hardware`].
//!
//! Bit order: qubit `i` is bit `i` of [`RngSample::value`], and the
//! bitstring is printed highest qubit first, so
//! `value == u64::from_str_radix(&bitstring, 2)` on every path.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use qlab_adapter_sim::{MAX_QUBITS, Sampler};
use qlab_compile::{BasisGates, CouplingMap, MAX_OPTIMIZATION_LEVEL, PassManagerBuilder};
use qlab_hal::{BackendSelector, Capabilities, EnvTokenProvider, HalError, WaitPolicy};
use qlab_ir::{Circuit, IrError, IrResult};

use crate::error::{PrimitivesError, PrimitivesResult};

/// Environment variable overriding the hardware poll interval in milliseconds.
pub const POLL_MS_VAR: &str = "QLAB_HW_POLL_MS";

/// Environment variable overriding the hardware job timeout in seconds.
pub const TIMEOUT_SECS_VAR: &str = "QLAB_HW_TIMEOUT_SECS";

/// Widest RNG the local sampler accepts.
pub const MAX_SIMULATED_BITS: u32 = MAX_QUBITS;

/// Widest RNG whose value fits in a `u64`.
pub const MAX_HARDWARE_BITS: u32 = u64::BITS;

/// One random bitstring and its integer value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngSample {
    pub bitstring: String,
    pub value: u64,
    pub num_bits: u32,
}

impl RngSample {
    /// Parse a measured bitstring, highest bit first.
    pub fn from_bitstring(bitstring: impl Into<String>) -> PrimitivesResult<Self> {
        let bitstring = bitstring.into();
        if bitstring.is_empty() || bitstring.len() > MAX_HARDWARE_BITS as usize {
            return Err(PrimitivesError::InvalidInput(format!(
                "bitstring must have 1 to {MAX_HARDWARE_BITS} bits, got {}",
                bitstring.len()
            )));
        }
        let value = u64::from_str_radix(&bitstring, 2).map_err(|_| {
            PrimitivesError::InvalidInput(format!("'{bitstring}' is not a binary string"))
        })?;
        let num_bits = u32::try_from(bitstring.len()).unwrap_or(u32::MAX);
        Ok(Self {
            bitstring,
            value,
            num_bits,
        })
    }
}

/// Hadamard on each of `num_bits` qubits, then measure all.
pub fn build_rng_circuit(num_bits: u32) -> IrResult<Circuit> {
    if num_bits == 0 {
        return Err(IrError::EmptyCircuit("rng".into()));
    }
    let mut circuit = Circuit::with_size("rng", num_bits, 0);
    circuit.h_all()?.measure_all()?;
    Ok(circuit)
}

/// Sample the RNG circuit once on the local statevector sampler.
pub fn rng_statevector(num_bits: u32) -> PrimitivesResult<(RngSample, Circuit)> {
    rng_statevector_with_rng(num_bits, &mut rand::thread_rng())
}

/// [`rng_statevector`] drawing measurement randomness from `rng`.
pub fn rng_statevector_with_rng<R: Rng + ?Sized>(
    num_bits: u32,
    rng: &mut R,
) -> PrimitivesResult<(RngSample, Circuit)> {
    if num_bits > MAX_SIMULATED_BITS {
        return Err(PrimitivesError::InvalidInput(format!(
            "{num_bits} bits requested, the simulator supports at most {MAX_SIMULATED_BITS}"
        )));
    }
    let circuit = build_rng_circuit(num_bits)?;
    let bitstring = Sampler::new().sample_once(&circuit, rng)?;
    let sample = RngSample::from_bitstring(bitstring)?;
    Ok((sample, circuit))
}

/// Settings for [`rng_hardware`].
#[derive(Debug, Clone)]
pub struct HardwareOptions {
    /// Transpiler optimization level, 0 to 3.
    pub optimization_level: u8,
    /// Poll interval and timeout for the remote job.
    pub wait: WaitPolicy,
    /// Credential checked before the selector is consulted.
    pub credential: Option<EnvTokenProvider>,
}

impl Default for HardwareOptions {
    fn default() -> Self {
        Self {
            optimization_level: 3,
            wait: WaitPolicy::hardware(),
            credential: None,
        }
    }
}

impl HardwareOptions {
    /// Require `IBM_QUANTUM_API_KEY` and read the wait policy overrides.
    pub fn from_env() -> Self {
        let defaults = WaitPolicy::hardware();
        let poll = env_u64(POLL_MS_VAR)
            .map(Duration::from_millis)
            .unwrap_or(defaults.poll_interval);
        let timeout = env_u64(TIMEOUT_SECS_VAR)
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);
        Self::default()
            .with_credential(EnvTokenProvider::ibm())
            .with_wait(WaitPolicy::new(poll, timeout))
    }

    #[must_use]
    pub fn with_credential(mut self, credential: EnvTokenProvider) -> Self {
        self.credential = Some(credential);
        self
    }

    #[must_use]
    pub fn with_wait(mut self, wait: WaitPolicy) -> Self {
        self.wait = wait;
        self
    }

    #[must_use]
    pub fn with_optimization_level(mut self, level: u8) -> Self {
        self.optimization_level = level.min(MAX_OPTIMIZATION_LEVEL);
        self
    }
}

fn env_u64(var: &str) -> Option<u64> {
    let raw = std::env::var(var).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(var, value = %raw, "ignoring non-numeric override");
            None
        }
    }
}

/// Lower `circuit` onto a backend's native gates and coupling map.
pub fn transpile_for(
    circuit: &Circuit,
    capabilities: &Capabilities,
    optimization_level: u8,
) -> PrimitivesResult<Circuit> {
    let coupling = CouplingMap::from_edges(capabilities.num_qubits, &capabilities.topology.edges);
    let basis = BasisGates::new(capabilities.gate_set.native_names());
    let (pm, mut properties) = PassManagerBuilder::new()
        .with_optimization_level(optimization_level)
        .with_target(coupling, basis)
        .build();

    let mut dag = circuit.clone().into_dag();
    pm.run(&mut dag, &mut properties)?;
    Ok(Circuit::from_dag(circuit.name(), dag))
}

/// Sample the RNG circuit once on a backend chosen by `selector`.
///
/// The credential in `options` is checked first, then the width: more than
/// [`MAX_HARDWARE_BITS`] is refused before any backend is selected. Remote failures are returned as they are, with
/// no retry and no simulator fallback.
#[instrument(skip(selector, options), fields(selector = selector.describe()))]
pub async fn rng_hardware(
    num_bits: u32,
    selector: &dyn BackendSelector,
    options: &HardwareOptions,
) -> PrimitivesResult<RngSample> {
    if let Some(credential) = &options.credential {
        credential.get_token()?;
    }

    let circuit = build_rng_circuit(num_bits)?;
    if num_bits > MAX_HARDWARE_BITS {
        return Err(PrimitivesError::InvalidInput(format!(
            "{num_bits} bits requested, at most {MAX_HARDWARE_BITS} fit in one value"
        )));
    }
    let handle = selector.select_backend().await?;
    let backend = handle.backend();
    let compiled = transpile_for(&circuit, backend.capabilities(), options.optimization_level)?;

    let job_id = backend.submit(&compiled, 1).await?;
    info!(
        backend = handle.name(),
        queue_depth = ?handle.queue_depth(),
        %job_id,
        depth = compiled.depth(),
        "submitted RNG job"
    );
    let result = backend.wait_with(&job_id, &options.wait).await?;

    let (bitstring, _) = result.counts.most_frequent().ok_or_else(|| {
        PrimitivesError::Remote(HalError::Backend(format!("job {job_id} returned no outcome")))
    })?;
    let sample = RngSample::from_bitstring(bitstring)?;
    if sample.num_bits != num_bits {
        return Err(PrimitivesError::Remote(HalError::Backend(format!(
            "expected {num_bits} bits, backend returned '{}'",
            sample.bitstring
        ))));
    }
    Ok(sample)
}
