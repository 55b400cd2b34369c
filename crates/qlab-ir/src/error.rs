use thiserror::Error;

use crate::qubit::{ClbitId, QubitId};

/// Rejected circuit edits.
///
/// `op` is the instruction name (`"cx"`, `"measure"`, ...) being applied.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    #[error("{op}: qubit {qubit} is not part of the circuit")]
    QubitNotFound { qubit: QubitId, op: &'static str },

    #[error("{op}: classical bit {clbit} is not part of the circuit")]
    ClbitNotFound { clbit: ClbitId, op: &'static str },

    #[error("{op} acts on {expected} qubit(s), got {got}")]
    QubitCountMismatch {
        op: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{op}: qubit {qubit} used twice")]
    DuplicateQubit { qubit: QubitId, op: &'static str },

    /// Each measured qubit needs exactly one target bit.
    #[error("measuring {qubits} qubit(s) into {clbits} classical bit(s)")]
    MeasureMismatch { qubits: usize, clbits: usize },

    #[error("{op} angle must be finite, got {angle}")]
    NonFiniteAngle { op: &'static str, angle: f64 },

    /// Carries the circuit name.
    #[error("circuit '{0}' has no qubits")]
    EmptyCircuit(String),

    /// Graph invariant broken; only reported by integrity checks.
    #[error("malformed circuit graph: {0}")]
    InvalidDag(String),
}

pub type IrResult<T> = Result<T, IrError>;
