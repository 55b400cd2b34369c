//! Circuits as a dependency graph over wires.
//!
//! Every wire starts at an `In` node and ends at an `Out` node. Applying an
//! instruction splices a new `Op` node in front of the `Out` node of each
//! wire it touches. Nodes are only appended, so node index order is a
//! valid topological order; passes build a new DAG instead of editing one.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{ClbitId, QubitId};

pub type NodeIndex = PetNodeIndex<u32>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DagNode {
    In(WireId),
    Out(WireId),
    Op(Instruction),
}

impl DagNode {
    #[inline]
    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            DagNode::Op(inst) => Some(inst),
            DagNode::In(_) | DagNode::Out(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WireId {
    Qubit(QubitId),
    Clbit(ClbitId),
}

/// Edge weight: the wire the dependency travels along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DagEdge {
    pub wire: WireId,
}

/// Whether qubit indices still refer to virtual or to device qubits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CircuitLevel {
    #[default]
    Logical,
    /// Set once a layout pass has placed the circuit.
    Physical,
}

/// Bookkeeping for one wire.
#[derive(Debug, Clone, Copy)]
struct WireEnds {
    output: NodeIndex,
    /// Node currently feeding `output`.
    last: NodeIndex,
    /// Layers of non-barrier operations on this wire so far.
    depth: usize,
}

#[derive(Debug, Clone, Default)]
pub struct CircuitDag {
    graph: DiGraph<DagNode, DagEdge, u32>,
    wires: FxHashMap<WireId, WireEnds>,
    /// Kept sorted.
    qubits: Vec<QubitId>,
    /// Kept sorted.
    clbits: Vec<ClbitId>,
    depth: usize,
    level: CircuitLevel,
}

impl CircuitDag {
    pub fn new() -> Self {
        Self::default()
    }

    /// No-op for a qubit that is already present.
    pub fn add_qubit(&mut self, qubit: QubitId) {
        if let Err(pos) = self.qubits.binary_search(&qubit) {
            self.qubits.insert(pos, qubit);
            self.open_wire(WireId::Qubit(qubit));
        }
    }

    /// No-op for a bit that is already present.
    pub fn add_clbit(&mut self, clbit: ClbitId) {
        if let Err(pos) = self.clbits.binary_search(&clbit) {
            self.clbits.insert(pos, clbit);
            self.open_wire(WireId::Clbit(clbit));
        }
    }

    fn open_wire(&mut self, wire: WireId) {
        let input = self.graph.add_node(DagNode::In(wire));
        let output = self.graph.add_node(DagNode::Out(wire));
        self.graph.add_edge(input, output, DagEdge { wire });
        self.wires.insert(
            wire,
            WireEnds {
                output,
                last: input,
                depth: 0,
            },
        );
    }

    /// Operands must exist, be distinct and match the gate's arity; rotation
    /// angles must be finite.
    fn operand_wires(&self, inst: &Instruction) -> IrResult<Vec<(WireId, WireEnds)>> {
        let op = inst.name();

        if let Some(gate) = inst.as_gate() {
            let expected = gate.num_qubits() as usize;
            if inst.qubits.len() != expected {
                return Err(IrError::QubitCountMismatch {
                    op,
                    expected,
                    got: inst.qubits.len(),
                });
            }
            if let Some(angle) = gate.angle().filter(|a| !a.is_finite()) {
                return Err(IrError::NonFiniteAngle { op, angle });
            }
        }

        let mut seen = FxHashSet::default();
        let mut wires = Vec::with_capacity(inst.qubits.len() + inst.clbits.len());
        for &qubit in &inst.qubits {
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit { qubit, op });
            }
            let wire = WireId::Qubit(qubit);
            let ends = self
                .wires
                .get(&wire)
                .ok_or(IrError::QubitNotFound { qubit, op })?;
            wires.push((wire, *ends));
        }
        for &clbit in &inst.clbits {
            let wire = WireId::Clbit(clbit);
            let ends = self
                .wires
                .get(&wire)
                .ok_or(IrError::ClbitNotFound { clbit, op })?;
            wires.push((wire, *ends));
        }
        Ok(wires)
    }

    /// Append `instruction` after everything already on its wires.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<NodeIndex> {
        let operands = self.operand_wires(&instruction)?;

        let layer = operands.iter().map(|(_, ends)| ends.depth).max().unwrap_or(0)
            + usize::from(instruction.kind != InstructionKind::Barrier);

        let node = self.graph.add_node(DagNode::Op(instruction));
        for (wire, ends) in operands {
            if let Some(edge) = self.graph.find_edge(ends.last, ends.output) {
                self.graph.remove_edge(edge);
            }
            self.graph.add_edge(ends.last, node, DagEdge { wire });
            self.graph.add_edge(node, ends.output, DagEdge { wire });
            self.wires.insert(
                wire,
                WireEnds {
                    last: node,
                    depth: layer,
                    ..ends
                },
            );
        }

        self.depth = self.depth.max(layer);
        Ok(node)
    }

    /// Operations in application order.
    pub fn topological_ops(&self) -> impl Iterator<Item = (NodeIndex, &Instruction)> {
        self.graph
            .node_indices()
            .filter_map(|idx| self.graph[idx].instruction().map(|inst| (idx, inst)))
    }

    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    #[inline]
    pub fn num_clbits(&self) -> usize {
        self.clbits.len()
    }

    /// Operation nodes, excluding wire endpoints.
    #[inline]
    pub fn num_ops(&self) -> usize {
        self.graph.node_count() - 2 * self.wires.len()
    }

    /// Operations named `name` (`"h"`, `"measure"`, ...).
    pub fn count_ops(&self, name: &str) -> usize {
        self.topological_ops()
            .filter(|(_, inst)| inst.name() == name)
            .count()
    }

    /// Longest chain of non-barrier operations along any wire.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    pub fn clbits(&self) -> &[ClbitId] {
        &self.clbits
    }

    pub fn level(&self) -> CircuitLevel {
        self.level
    }

    pub fn set_level(&mut self, level: CircuitLevel) {
        self.level = level;
    }

    /// Check that the graph is acyclic and that every wire is one unbroken
    /// path from its `In` node to its `Out` node.
    pub fn verify_integrity(&self) -> IrResult<()> {
        if petgraph::algo::is_cyclic_directed(&self.graph) {
            return Err(IrError::InvalidDag("cycle detected".into()));
        }

        for idx in self.graph.node_indices() {
            let DagNode::In(wire) = self.graph[idx] else {
                continue;
            };
            let ends = self
                .wires
                .get(&wire)
                .ok_or_else(|| IrError::InvalidDag(format!("{wire:?} has no bookkeeping")))?;

            let mut current = idx;
            let mut previous = idx;
            for _ in 0..self.graph.node_count() {
                if current == ends.output {
                    break;
                }
                let mut next = self
                    .graph
                    .edges_directed(current, Direction::Outgoing)
                    .filter(|e| e.weight().wire == wire)
                    .map(|e| e.target());
                let (Some(step), None) = (next.next(), next.next()) else {
                    return Err(IrError::InvalidDag(format!(
                        "{wire:?} does not continue uniquely from node {}",
                        current.index()
                    )));
                };
                previous = current;
                current = step;
            }

            if current != ends.output || previous != ends.last {
                return Err(IrError::InvalidDag(format!("{wire:?} does not reach its output")));
            }
        }
        Ok(())
    }
}
