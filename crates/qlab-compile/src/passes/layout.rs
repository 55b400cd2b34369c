//! Placing virtual qubits on the device.

use qlab_ir::{CircuitDag, CircuitLevel, Instruction};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::{CouplingMap, Layout, PropertySet};

fn coupling(properties: &PropertySet) -> CompileResult<&CouplingMap> {
    properties
        .coupling_map
        .as_ref()
        .ok_or(CompileError::MissingCouplingMap)
}

/// Places virtual qubit `i` on physical qubit `i` and marks the DAG physical.
pub struct TrivialLayout;

impl Pass for TrivialLayout {
    fn name(&self) -> &'static str {
        "TrivialLayout"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let available = coupling(properties)?.num_qubits();
        let required = dag.num_qubits();
        let width = u32::try_from(required)
            .ok()
            .filter(|&w| w <= available)
            .ok_or(CompileError::CircuitTooLarge {
                required,
                available,
            })?;

        properties.layout = Some(Layout::trivial(width));
        dag.set_level(CircuitLevel::Physical);
        Ok(())
    }

    fn should_run(&self, _dag: &CircuitDag, properties: &PropertySet) -> bool {
        properties.layout.is_none()
    }
}

/// Fails on the first two-qubit gate whose physical pair has no coupler.
///
/// No SWAP routing is attempted.
pub struct CheckConnectivity;

impl CheckConnectivity {
    fn check(inst: &Instruction, layout: &Layout, coupling: &CouplingMap) -> CompileResult<()> {
        let [a, b] = inst.qubits.as_slice() else {
            return Ok(());
        };
        let place = |q| layout.get_physical(q).ok_or(CompileError::MissingLayout);
        let (pa, pb) = (place(*a)?, place(*b)?);
        if coupling.is_connected(pa, pb) {
            Ok(())
        } else {
            Err(CompileError::NotConnected(pa, pb))
        }
    }
}

impl Pass for CheckConnectivity {
    fn name(&self) -> &'static str {
        "CheckConnectivity"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let coupling = coupling(properties)?;
        let layout = properties
            .layout
            .as_ref()
            .ok_or(CompileError::MissingLayout)?;

        dag.topological_ops()
            .filter(|(_, inst)| inst.as_gate().is_some_and(|g| g.num_qubits() == 2))
            .try_for_each(|(_, inst)| Self::check(inst, layout, coupling))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::BasisGates;
    use qlab_ir::{Circuit, QubitId};

    fn heron_props(n: u32) -> PropertySet {
        PropertySet::new().with_target(CouplingMap::linear(n), BasisGates::heron())
    }

    #[test]
    fn test_trivial_layout_marks_dag_physical() {
        let mut circuit = Circuit::with_size("three", 3, 0);
        circuit.h(QubitId(0)).unwrap();
        let mut dag = circuit.into_dag();
        assert_eq!(dag.level(), CircuitLevel::Logical);

        let mut props = heron_props(5);
        TrivialLayout.run(&mut dag, &mut props).unwrap();

        assert_eq!(props.layout, Some(Layout::trivial(3)));
        assert_eq!(dag.level(), CircuitLevel::Physical);
    }

    #[test]
    fn test_circuit_wider_than_device() {
        let mut dag = Circuit::with_size("wide", 10, 0).into_dag();
        let err = TrivialLayout.run(&mut dag, &mut heron_props(5)).unwrap_err();
        assert!(matches!(
            err,
            CompileError::CircuitTooLarge {
                required: 10,
                available: 5
            }
        ));
    }

    #[test]
    fn test_layout_needs_coupling_map() {
        let mut dag = Circuit::with_size("one", 1, 0).into_dag();
        assert!(matches!(
            TrivialLayout.run(&mut dag, &mut PropertySet::new()),
            Err(CompileError::MissingCouplingMap)
        ));
    }

    #[test]
    fn test_neighbours_pass_distant_pair_fails() {
        let mut props = PropertySet::new()
            .with_target(CouplingMap::linear(3), BasisGates::ibm())
            .with_layout(Layout::trivial(3));

        let mut near = Circuit::with_size("near", 3, 0);
        near.cx(QubitId(1), QubitId(0)).unwrap();
        CheckConnectivity.run(&mut near.into_dag(), &mut props).unwrap();

        let mut far = Circuit::with_size("far", 3, 0);
        far.cz(QubitId(0), QubitId(2)).unwrap();
        assert!(matches!(
            CheckConnectivity.run(&mut far.into_dag(), &mut props),
            Err(CompileError::NotConnected(0, 2))
        ));
    }

    #[test]
    fn test_connectivity_needs_layout() {
        let mut circuit = Circuit::with_size("pair", 2, 0);
        circuit.cz(QubitId(0), QubitId(1)).unwrap();
        assert!(matches!(
            CheckConnectivity.run(&mut circuit.into_dag(), &mut heron_props(2)),
            Err(CompileError::MissingLayout)
        ));
    }
}
