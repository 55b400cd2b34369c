use qlab_ir::IrError;
use thiserror::Error;

/// Why a circuit could not be lowered onto a target.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    #[error("no basis gates configured for translation")]
    MissingBasisGates,

    #[error("no coupling map configured for layout")]
    MissingCouplingMap,

    #[error("connectivity check ran before a layout was chosen")]
    MissingLayout,

    #[error("circuit uses {required} qubits, target only has {available}")]
    CircuitTooLarge { required: usize, available: u32 },

    /// No rewrite rule reaches the target basis from this gate.
    #[error("gate '{0}' has no decomposition into the target basis")]
    GateNotInBasis(String),

    /// Physical qubits of a two-qubit gate share no coupler.
    #[error("physical qubits {0} and {1} are not coupled")]
    NotConnected(u32, u32),

    #[error(transparent)]
    Ir(#[from] IrError),
}

pub type CompileResult<T> = Result<T, CompileError>;
