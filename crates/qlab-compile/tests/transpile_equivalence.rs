//! Transpiled circuits must prepare the same state as their source, up to
//! global phase. Checked through Z and X basis expectations on the
//! statevector simulator.

use proptest::prelude::*;
use qlab_adapter_sim::Estimator;
use qlab_compile::{BasisGates, CouplingMap, PassManagerBuilder};
use qlab_ir::{Circuit, QubitId, StandardGate};

fn transpile(circuit: &Circuit, basis: BasisGates, level: u8) -> Circuit {
    let (pm, mut props) = PassManagerBuilder::new()
        .with_optimization_level(level)
        .with_target(CouplingMap::linear(circuit.num_qubits() as u32), basis)
        .build();
    let mut dag = circuit.clone().into_dag();
    pm.run(&mut dag, &mut props).unwrap();
    Circuit::from_dag(circuit.name(), dag)
}

/// ⟨Z0⟩, ⟨Z1⟩, ⟨Z0Z1⟩ in the computational basis and after H on both
/// qubits (the X basis).
fn signature(circuit: &Circuit) -> Vec<f64> {
    let est = Estimator::new();
    let mut rotated = circuit.clone();
    rotated.h(QubitId(0)).unwrap().h(QubitId(1)).unwrap();

    let mut out = Vec::new();
    for c in [circuit, &rotated] {
        out.push(est.expectation_z(c, &[QubitId(0)]).unwrap());
        out.push(est.expectation_z(c, &[QubitId(1)]).unwrap());
        out.push(est.expectation_zz(c, QubitId(0), QubitId(1)).unwrap());
    }
    out
}

fn assert_equivalent(a: &Circuit, b: &Circuit) {
    for (x, y) in signature(a).iter().zip(signature(b)) {
        assert!((x - y).abs() < 1e-9, "{x} != {y}");
    }
}

#[test]
fn test_feature_map_on_heron() {
    for entangle in [false, true] {
        let mut circuit = Circuit::with_size("feature_map", 2, 0);
        circuit.ry(0.8, QubitId(0)).unwrap().ry(2.4, QubitId(1)).unwrap();
        if entangle {
            circuit.cx(QubitId(0), QubitId(1)).unwrap();
        }

        let compiled = transpile(&circuit, BasisGates::heron(), 3);
        assert_eq!(compiled.dag().count_ops("ry"), 0);
        assert_eq!(compiled.dag().count_ops("cx"), 0);
        assert_equivalent(&circuit, &compiled);
    }
}

#[test]
fn test_h_translation_is_exact_inverse() {
    // Translated H followed by a real H returns to |0⟩.
    let mut circuit = Circuit::with_size("h", 1, 0);
    circuit.h(QubitId(0)).unwrap();
    let mut compiled = transpile(&circuit, BasisGates::ibm(), 0);
    compiled.h(QubitId(0)).unwrap();

    let z = Estimator::new().expectation_z(&compiled, &[QubitId(0)]).unwrap();
    assert!((z - 1.0).abs() < 1e-12);
}

#[test]
fn test_rng_circuit_keeps_measurements() {
    let mut circuit = Circuit::with_size("rng", 5, 0);
    circuit.h_all().unwrap().measure_all().unwrap();

    let compiled = transpile(&circuit, BasisGates::heron(), 3);
    assert_eq!(compiled.num_qubits(), 5);
    assert_eq!(compiled.num_clbits(), 5);
    assert!(compiled.has_measurements());
    assert_eq!(compiled.dag().count_ops("h"), 0);
    assert_eq!(compiled.dag().count_ops("sx"), 5);
}

fn gate_strategy() -> impl Strategy<Value = (StandardGate, u32)> {
    prop_oneof![
        (0u32..2).prop_map(|q| (StandardGate::H, q)),
        (0u32..2).prop_map(|q| (StandardGate::X, q)),
        (0u32..2).prop_map(|q| (StandardGate::Z, q)),
        (0u32..2).prop_map(|q| (StandardGate::SX, q)),
        (0u32..2).prop_map(|q| (StandardGate::I, q)),
        (-6.0f64..6.0, 0u32..2).prop_map(|(t, q)| (StandardGate::Ry(t), q)),
        (-6.0f64..6.0, 0u32..2).prop_map(|(t, q)| (StandardGate::Rz(t), q)),
        (0u32..2).prop_map(|c| (StandardGate::CX, c)),
        (0u32..2).prop_map(|c| (StandardGate::CZ, c)),
    ]
}

proptest! {
    #[test]
    fn prop_transpile_preserves_state(
        gates in prop::collection::vec(gate_strategy(), 0..24),
        level in 0u8..=3,
        heron in any::<bool>(),
    ) {
        let mut circuit = Circuit::with_size("random", 2, 0);
        for (gate, q) in gates {
            let qubits = if gate.num_qubits() == 2 {
                vec![QubitId(q), QubitId(1 - q)]
            } else {
                vec![QubitId(q)]
            };
            circuit.gate(gate, qubits).unwrap();
        }

        let basis = if heron { BasisGates::heron() } else { BasisGates::ibm() };
        let compiled = transpile(&circuit, basis.clone(), level);

        for (_, inst) in compiled.dag().topological_ops() {
            prop_assert!(basis.contains(inst.name()), "{} not in basis", inst.name());
        }
        for (x, y) in signature(&circuit).iter().zip(signature(&compiled)) {
            prop_assert!((x - y).abs() < 1e-9);
        }
    }
}
