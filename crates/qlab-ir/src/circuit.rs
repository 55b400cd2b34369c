//! Chained circuit construction.

use crate::dag::CircuitDag;
use crate::error::IrResult;
use crate::gate::StandardGate;
use crate::instruction::Instruction;
use crate::qubit::{ClbitId, QubitId};

/// A named circuit.
///
/// Every builder method validates through [`CircuitDag::apply`] and returns
/// `&mut Self`, so a sequence reads as `c.h(q)?.cx(q, t)?.measure_all()?`.
#[derive(Debug, Clone)]
pub struct Circuit {
    name: String,
    dag: CircuitDag,
}

impl Circuit {
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_dag(name, CircuitDag::new())
    }

    /// Qubits `0..num_qubits` and classical bits `0..num_clbits`.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut dag = CircuitDag::new();
        (0..num_qubits).for_each(|q| dag.add_qubit(QubitId(q)));
        (0..num_clbits).for_each(|c| dag.add_clbit(ClbitId(c)));
        Self::from_dag(name, dag)
    }

    /// Wrap an existing DAG, e.g. the output of a transpiler run.
    pub fn from_dag(name: impl Into<String>, dag: CircuitDag) -> Self {
        Self {
            name: name.into(),
            dag,
        }
    }

    /// Append the next qubit index.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = QubitId(self.dag.qubits().last().map_or(0, |q| q.0 + 1));
        self.dag.add_qubit(id);
        id
    }

    /// Append the next classical bit index.
    pub fn add_clbit(&mut self) -> ClbitId {
        let id = ClbitId(self.dag.clbits().last().map_or(0, |c| c.0 + 1));
        self.dag.add_clbit(id);
        id
    }

    fn push(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.dag.apply(instruction)?;
        Ok(self)
    }

    pub fn gate(
        &mut self,
        gate: StandardGate,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.push(Instruction::gate(gate, qubits))
    }

    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::H, [qubit])
    }

    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::X, [qubit])
    }

    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Z, [qubit])
    }

    pub fn sx(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::SX, [qubit])
    }

    /// `theta` in radians.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Ry(theta), [qubit])
    }

    /// `theta` in radians.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Rz(theta), [qubit])
    }

    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CX, [control, target])
    }

    pub fn cz(&mut self, a: QubitId, b: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CZ, [a, b])
    }

    /// Hadamard on every qubit, lowest index first.
    pub fn h_all(&mut self) -> IrResult<&mut Self> {
        let qubits = self.dag.qubits().to_vec();
        for q in qubits {
            self.h(q)?;
        }
        Ok(self)
    }

    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.push(Instruction::measure(qubit, clbit))
    }

    pub fn barrier_all(&mut self) -> IrResult<&mut Self> {
        let qubits = self.dag.qubits().to_vec();
        self.push(Instruction::barrier(qubits))
    }

    /// A single measurement of every qubit, qubit `i` into classical bit
    /// `i`. Missing classical bits are created first.
    pub fn measure_all(&mut self) -> IrResult<&mut Self> {
        while self.dag.num_clbits() < self.dag.num_qubits() {
            self.add_clbit();
        }
        let qubits = self.dag.qubits().to_vec();
        let clbits = qubits.iter().map(|q| ClbitId(q.0));
        let inst = Instruction::measure_all(qubits.iter().copied(), clbits)?;
        self.push(inst)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_qubits(&self) -> usize {
        self.dag.num_qubits()
    }

    pub fn num_clbits(&self) -> usize {
        self.dag.num_clbits()
    }

    pub fn depth(&self) -> usize {
        self.dag.depth()
    }

    pub fn has_measurements(&self) -> bool {
        self.dag.topological_ops().any(|(_, inst)| inst.is_measure())
    }

    pub fn dag(&self) -> &CircuitDag {
        &self.dag
    }

    pub fn into_dag(self) -> CircuitDag {
        self.dag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_empty_circuit() {
        let mut circuit = Circuit::new("grow");
        assert_eq!((circuit.num_qubits(), circuit.num_clbits()), (0, 0));

        assert_eq!(circuit.add_qubit(), QubitId(0));
        assert_eq!(circuit.add_qubit(), QubitId(1));
        assert_eq!(circuit.name(), "grow");
    }

    #[test]
    fn test_rng_shape() {
        let mut circuit = Circuit::with_size("rng", 4, 0);
        circuit.h_all().unwrap().measure_all().unwrap();

        assert_eq!(circuit.num_clbits(), 4);
        assert_eq!(circuit.dag().count_ops("h"), 4);
        assert_eq!(circuit.dag().count_ops("measure"), 1);
        assert_eq!(circuit.depth(), 2);
        assert!(circuit.has_measurements());
    }

    #[test]
    fn test_measure_all_keeps_extra_clbits() {
        let mut circuit = Circuit::with_size("wide", 2, 3);
        circuit.measure_all().unwrap();
        assert_eq!(circuit.num_clbits(), 3);
    }

    #[test]
    fn test_entangled_feature_map() {
        let mut circuit = Circuit::with_size("feature_map", 2, 0);
        circuit
            .ry(PI / 3.0, QubitId(0))
            .unwrap()
            .ry(PI / 4.0, QubitId(1))
            .unwrap()
            .cx(QubitId(0), QubitId(1))
            .unwrap();

        assert_eq!(circuit.depth(), 2);
        assert!(!circuit.has_measurements());
    }

    #[test]
    fn test_failed_gate_leaves_circuit_unchanged() {
        let mut circuit = Circuit::with_size("one", 1, 0);
        assert!(circuit.cx(QubitId(0), QubitId(1)).is_err());
        assert_eq!(circuit.dag().num_ops(), 0);
    }

    #[test]
    fn test_from_dag_keeps_wires() {
        let mut circuit = Circuit::with_size("src", 3, 0);
        circuit.h(QubitId(2)).unwrap();
        let rebuilt = Circuit::from_dag("rebuilt", circuit.into_dag());
        assert_eq!(rebuilt.num_qubits(), 3);
        assert_eq!(rebuilt.dag().num_ops(), 1);
    }
}
