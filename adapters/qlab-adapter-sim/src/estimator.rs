//! Exact expectation values.

use tracing::trace;

use qlab_hal::{HalError, HalResult};
use qlab_ir::{Circuit, QubitId};

use crate::simulator::MAX_QUBITS;
use crate::statevector::Statevector;

/// Noise-free estimator of Pauli-Z string expectations.
///
/// The circuit is simulated once and ⟨Z…Z⟩ is read off the amplitudes,
/// so results are deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct Estimator {
    _private: (),
}

impl Estimator {
    /// Create an estimator.
    pub fn new() -> Self {
        Self::default()
    }

    /// ⟨Z⊗Z⟩ on a pair of qubits.
    pub fn expectation_zz(&self, circuit: &Circuit, q0: QubitId, q1: QubitId) -> HalResult<f64> {
        self.expectation_z(circuit, &[q0, q1])
    }

    /// ⟨Z⊗…⊗Z⟩ over `qubits`, identity elsewhere.
    pub fn expectation_z(&self, circuit: &Circuit, qubits: &[QubitId]) -> HalResult<f64> {
        if circuit.num_qubits() > MAX_QUBITS as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {} qubits but simulator only supports {}",
                circuit.num_qubits(),
                MAX_QUBITS
            )));
        }
        if let Some(q) = qubits.iter().find(|q| q.0 as usize >= circuit.num_qubits()) {
            return Err(HalError::InvalidCircuit(format!(
                "observable acts on {q} but circuit '{}' has {} qubits",
                circuit.name(),
                circuit.num_qubits()
            )));
        }

        let sv = Statevector::from_circuit(circuit);
        let indices: Vec<usize> = qubits.iter().map(|q| q.0 as usize).collect();
        let value = sv.expectation_z(&indices);
        trace!(circuit = circuit.name(), qubits = sv.num_qubits(), value, "expectation");
        Ok(value)
    }
}
