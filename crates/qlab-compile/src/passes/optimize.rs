//! Peephole optimizations over adjacent gates on the same wires.

use std::f64::consts::{PI, TAU};

use rustc_hash::FxHashMap;

use qlab_ir::{CircuitDag, Instruction, InstructionKind, QubitId, StandardGate};

use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Angles closer than this to zero (mod 2π) are treated as identity.
const EPSILON: f64 = 1e-10;

/// Output buffer that remembers the last kept instruction on every qubit.
///
/// Removing an instruction pops it from each of its wires, so the
/// instruction before it becomes adjacent to whatever comes next.
#[derive(Default)]
struct WireBuffer {
    ops: Vec<Option<Instruction>>,
    wires: FxHashMap<QubitId, Vec<usize>>,
}

impl WireBuffer {
    fn push(&mut self, inst: Instruction) {
        let idx = self.ops.len();
        for q in &inst.qubits {
            self.wires.entry(*q).or_default().push(idx);
        }
        self.ops.push(Some(inst));
    }

    /// Index of the last kept instruction if it is the latest one on every
    /// wire in `qubits`.
    fn shared_front(&self, qubits: &[QubitId]) -> Option<usize> {
        let mut front = None;
        for q in qubits {
            let top = *self.wires.get(q)?.last()?;
            match front {
                None => front = Some(top),
                Some(f) if f == top => {}
                Some(_) => return None,
            }
        }
        front
    }

    fn get(&self, idx: usize) -> Option<&Instruction> {
        self.ops.get(idx)?.as_ref()
    }

    fn get_mut(&mut self, idx: usize) -> Option<&mut Instruction> {
        self.ops.get_mut(idx)?.as_mut()
    }

    fn remove(&mut self, idx: usize) {
        if let Some(inst) = self.ops.get_mut(idx).and_then(Option::take) {
            for q in &inst.qubits {
                if let Some(stack) = self.wires.get_mut(q) {
                    stack.pop();
                }
            }
        }
    }

    fn into_ops(self) -> impl Iterator<Item = Instruction> {
        self.ops.into_iter().flatten()
    }
}

/// Wrap an angle into (-π, π].
fn normalize(theta: f64) -> f64 {
    let wrapped = theta.rem_euclid(TAU);
    if wrapped > PI { wrapped - TAU } else { wrapped }
}

fn is_identity_angle(theta: f64) -> bool {
    normalize(theta).abs() < EPSILON
}

/// Single-qubit optimization pass.
///
/// Drops `id` gates, merges runs of RZ on the same wire into one rotation
/// and drops RZ rotations that wrap to zero.
pub struct Optimize1qGates;

impl Pass for Optimize1qGates {
    fn name(&self) -> &'static str {
        "Optimize1qGates"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, _properties: &mut PropertySet) -> CompileResult<()> {
        let mut buffer = WireBuffer::default();

        for (_, inst) in dag.topological_ops() {
            match inst.as_gate() {
                Some(StandardGate::I) => {}
                Some(StandardGate::Rz(theta)) => {
                    let theta = *theta;
                    let prev = buffer.shared_front(&inst.qubits).and_then(|idx| {
                        match buffer.get(idx)?.as_gate() {
                            Some(StandardGate::Rz(phi)) => Some((idx, *phi)),
                            _ => None,
                        }
                    });

                    match prev {
                        Some((idx, phi)) if is_identity_angle(phi + theta) => buffer.remove(idx),
                        Some((idx, phi)) => {
                            if let Some(p) = buffer.get_mut(idx) {
                                let merged = StandardGate::Rz(normalize(phi + theta));
                                p.kind = InstructionKind::Gate(merged);
                            }
                        }
                        None if is_identity_angle(theta) => {}
                        None => buffer.push(Instruction::gate(
                            StandardGate::Rz(normalize(theta)),
                            inst.qubits.iter().copied(),
                        )),
                    }
                }
                _ => buffer.push(inst.clone()),
            }
        }

        *dag = super::rebuild(dag, buffer.into_ops())?;
        Ok(())
    }
}

/// Cancels adjacent pairs of identical CX or CZ gates.
///
/// CX·CX = I on the same control and target. CZ is symmetric, so a pair
/// cancels regardless of qubit order.
pub struct CancelCX;

impl Pass for CancelCX {
    fn name(&self) -> &'static str {
        "CancelCX"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, dag: &mut CircuitDag, _properties: &mut PropertySet) -> CompileResult<()> {
        let mut buffer = WireBuffer::default();

        for (_, inst) in dag.topological_ops() {
            let Some(gate @ (StandardGate::CX | StandardGate::CZ)) = inst.as_gate().copied() else {
                buffer.push(inst.clone());
                continue;
            };

            let cancels = buffer
                .shared_front(&inst.qubits)
                .and_then(|idx| buffer.get(idx).map(|prev| (idx, prev)))
                .and_then(|(idx, prev)| {
                    let same = match (gate, prev.as_gate()) {
                        (StandardGate::CX, Some(StandardGate::CX)) => prev.qubits == inst.qubits,
                        (StandardGate::CZ, Some(StandardGate::CZ)) => true,
                        _ => false,
                    };
                    same.then_some(idx)
                });

            match cancels {
                Some(idx) => buffer.remove(idx),
                None => buffer.push(inst.clone()),
            }
        }

        *dag = super::rebuild(dag, buffer.into_ops())?;
        Ok(())
    }
}
