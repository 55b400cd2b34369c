//! Built-in compilation passes.

mod layout;
mod optimize;
mod translation;

pub use layout::{CheckConnectivity, TrivialLayout};
pub use optimize::{CancelCX, Optimize1qGates};
pub use translation::BasisTranslation;

use qlab_ir::{CircuitDag, Instruction};

use crate::error::CompileResult;

/// Replay `ops` onto fresh wires copied from `dag`, keeping its level.
pub(crate) fn rebuild(
    dag: &CircuitDag,
    ops: impl IntoIterator<Item = Instruction>,
) -> CompileResult<CircuitDag> {
    let mut out = CircuitDag::new();
    dag.qubits().iter().for_each(|&q| out.add_qubit(q));
    dag.clbits().iter().for_each(|&c| out.add_clbit(c));
    out.set_level(dag.level());
    ops.into_iter().try_for_each(|inst| out.apply(inst).map(drop))?;
    Ok(out)
}
