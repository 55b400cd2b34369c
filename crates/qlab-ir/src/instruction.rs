//! Operations placed on circuit wires.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::qubit::{ClbitId, QubitId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    Gate(StandardGate),
    /// Z-basis readout of `qubits[i]` into `clbits[i]`.
    Measure,
    /// Scheduling fence; no effect on the state.
    Barrier,
}

/// An operation together with the wires it touches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    pub kind: InstructionKind,
    pub qubits: Vec<QubitId>,
    /// Empty except for measurements.
    pub clbits: Vec<ClbitId>,
}

impl Instruction {
    fn on(kind: InstructionKind, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind,
            qubits: qubits.into_iter().collect(),
            clbits: Vec::new(),
        }
    }

    /// Operand count is checked when the instruction is applied, not here.
    pub fn gate(gate: StandardGate, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self::on(InstructionKind::Gate(gate), qubits)
    }

    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit])
    }

    pub fn two_qubit_gate(gate: StandardGate, first: QubitId, second: QubitId) -> Self {
        Self::gate(gate, [first, second])
    }

    pub fn measure(qubit: QubitId, clbit: ClbitId) -> Self {
        Self {
            clbits: vec![clbit],
            ..Self::on(InstructionKind::Measure, [qubit])
        }
    }

    /// One measurement over many qubits, pairing them with `clbits` in order.
    pub fn measure_all(
        qubits: impl IntoIterator<Item = QubitId>,
        clbits: impl IntoIterator<Item = ClbitId>,
    ) -> IrResult<Self> {
        let mut inst = Self::on(InstructionKind::Measure, qubits);
        inst.clbits = clbits.into_iter().collect();
        if inst.qubits.len() != inst.clbits.len() {
            return Err(IrError::MeasureMismatch {
                qubits: inst.qubits.len(),
                clbits: inst.clbits.len(),
            });
        }
        Ok(inst)
    }

    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self::on(InstructionKind::Barrier, qubits)
    }

    #[inline]
    pub fn as_gate(&self) -> Option<&StandardGate> {
        match &self.kind {
            InstructionKind::Gate(gate) => Some(gate),
            InstructionKind::Measure | InstructionKind::Barrier => None,
        }
    }

    #[inline]
    pub fn is_measure(&self) -> bool {
        self.kind == InstructionKind::Measure
    }

    /// Lowercase OpenQASM-style name.
    pub fn name(&self) -> &'static str {
        match &self.kind {
            InstructionKind::Gate(gate) => gate.name(),
            InstructionKind::Measure => "measure",
            InstructionKind::Barrier => "barrier",
        }
    }
}
