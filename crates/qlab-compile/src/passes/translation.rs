//! Basis translation to the IBM native gate set.

use std::f64::consts::{FRAC_PI_2, PI};

use qlab_ir::{CircuitDag, Instruction, QubitId, StandardGate};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::{BasisGates, PropertySet};

/// Basis translation pass.
///
/// Rewrites every gate outside the target basis using RZ and SX, and
/// swaps between CX and CZ depending on which one the device offers:
///
/// | Gate | Replacement (circuit order) |
/// |------|-----------------------------|
/// | `id` | removed |
/// | `x` | `sx`, `sx` |
/// | `z` | `rz(π)` |
/// | `h` | `rz(π/2)`, `sx`, `rz(π/2)` |
/// | `ry(θ)` | `sx`, `rz(θ+π)`, `sx`, `rz(π)` |
/// | `cx` | `h(t)`, `cz`, `h(t)` |
/// | `cz` | `h(t)`, `cx`, `h(t)` |
///
/// Replacements are translated again until only basis gates remain. Global
/// phase is not tracked.
pub struct BasisTranslation;

impl Pass for BasisTranslation {
    fn name(&self) -> &'static str {
        "BasisTranslation"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let basis = properties
            .basis_gates
            .as_ref()
            .ok_or(CompileError::MissingBasisGates)?;

        let mut ops = Vec::with_capacity(dag.num_ops());
        for (_, inst) in dag.topological_ops() {
            match inst.as_gate() {
                Some(gate) => lower(*gate, &inst.qubits, basis, &mut ops)?,
                None => ops.push(inst.clone()),
            }
        }

        *dag = super::rebuild(dag, ops)?;
        Ok(())
    }

    fn should_run(&self, _dag: &CircuitDag, properties: &PropertySet) -> bool {
        properties.basis_gates.is_some()
    }
}

fn lower(
    gate: StandardGate,
    qubits: &[QubitId],
    basis: &BasisGates,
    out: &mut Vec<Instruction>,
) -> CompileResult<()> {
    if basis.contains(gate.name()) {
        out.push(Instruction::gate(gate, qubits.iter().copied()));
        return Ok(());
    }

    let q = qubits[0];
    let rewrite: Vec<(StandardGate, Vec<QubitId>)> = match gate {
        StandardGate::I => vec![],
        StandardGate::X => vec![(StandardGate::SX, vec![q]), (StandardGate::SX, vec![q])],
        StandardGate::Z => vec![(StandardGate::Rz(PI), vec![q])],
        StandardGate::H => vec![
            (StandardGate::Rz(FRAC_PI_2), vec![q]),
            (StandardGate::SX, vec![q]),
            (StandardGate::Rz(FRAC_PI_2), vec![q]),
        ],
        StandardGate::Ry(theta) => vec![
            (StandardGate::SX, vec![q]),
            (StandardGate::Rz(theta + PI), vec![q]),
            (StandardGate::SX, vec![q]),
            (StandardGate::Rz(PI), vec![q]),
        ],
        StandardGate::CX if basis.contains("cz") => {
            let t = qubits[1];
            vec![
                (StandardGate::H, vec![t]),
                (StandardGate::CZ, vec![q, t]),
                (StandardGate::H, vec![t]),
            ]
        }
        StandardGate::CZ if basis.contains("cx") => {
            let t = qubits[1];
            vec![
                (StandardGate::H, vec![t]),
                (StandardGate::CX, vec![q, t]),
                (StandardGate::H, vec![t]),
            ]
        }
        StandardGate::SX | StandardGate::Rz(_) | StandardGate::CX | StandardGate::CZ => {
            return Err(CompileError::GateNotInBasis(gate.name().to_string()));
        }
    };

    for (g, qs) in rewrite {
        lower(g, &qs, basis, out)?;
    }
    Ok(())
}
