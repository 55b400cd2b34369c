//! What a backend can run.
//!
//! Capabilities are fixed when a backend is constructed. The transpiler
//! reads the topology and native gate names from here, and the selector
//! reads `is_simulator` when filtering a fleet.

use serde::{Deserialize, Serialize};

/// Static description of one backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    pub name: String,
    pub num_qubits: u32,
    pub gate_set: GateSet,
    pub topology: Topology,
    /// Upper bound for a single submission.
    pub max_shots: u32,
    pub is_simulator: bool,
}

impl Capabilities {
    /// The local statevector simulator: all-to-all coupling, every gate native.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            gate_set: GateSet::universal(),
            topology: Topology::full(num_qubits),
            max_shots: 1_000_000,
            is_simulator: true,
        }
    }

    /// A device as reported by the IBM backend configuration endpoint.
    ///
    /// An empty coupling map is read as a linear chain, which is what the
    /// service omits for the smallest devices.
    pub fn ibm(
        name: &str,
        num_qubits: u32,
        basis_gates: &[String],
        coupling_map: &[(u32, u32)],
        max_shots: u32,
    ) -> Self {
        let topology = match coupling_map {
            [] => Topology::linear(num_qubits),
            edges => Topology::custom(edges.to_vec()),
        };
        Self {
            name: name.to_owned(),
            num_qubits,
            gate_set: GateSet::from_basis(basis_gates),
            topology,
            max_shots,
            is_simulator: false,
        }
    }
}

/// Gate names a backend accepts without translation.
///
/// `measure` and `barrier` are always accepted and never listed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSet {
    native: Vec<String>,
}

const ALWAYS_ACCEPTED: [&str; 2] = ["measure", "barrier"];

impl GateSet {
    /// Every gate in the circuit IR.
    pub fn universal() -> Self {
        Self::from_basis(&["id", "x", "z", "h", "sx", "ry", "rz", "cx", "cz"])
    }

    /// Build from a reported basis list. Directives and duplicates are dropped.
    pub fn from_basis<S: AsRef<str>>(basis: &[S]) -> Self {
        let mut native: Vec<String> = Vec::with_capacity(basis.len());
        for name in basis.iter().map(AsRef::as_ref) {
            if !ALWAYS_ACCEPTED.contains(&name) && !native.iter().any(|n| n == name) {
                native.push(name.to_owned());
            }
        }
        Self { native }
    }

    pub fn is_native(&self, name: &str) -> bool {
        ALWAYS_ACCEPTED.contains(&name) || self.native.iter().any(|n| n == name)
    }

    /// Native gate names in reported order.
    pub fn native_names(&self) -> &[String] {
        &self.native
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopologyKind {
    Linear,
    FullyConnected,
    Custom,
}

/// Physical coupling of a backend's qubits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topology {
    pub kind: TopologyKind,
    pub edges: Vec<(u32, u32)>,
}

impl Topology {
    pub fn linear(n: u32) -> Self {
        Self {
            kind: TopologyKind::Linear,
            edges: (1..n).map(|b| (b - 1, b)).collect(),
        }
    }

    pub fn full(n: u32) -> Self {
        let edges = (0..n)
            .flat_map(|a| ((a + 1)..n).map(move |b| (a, b)))
            .collect();
        Self {
            kind: TopologyKind::FullyConnected,
            edges,
        }
    }

    pub fn custom(edges: Vec<(u32, u32)>) -> Self {
        Self {
            kind: TopologyKind::Custom,
            edges,
        }
    }

    /// Direction is ignored.
    pub fn is_connected(&self, a: u32, b: u32) -> bool {
        self.edges
            .iter()
            .any(|&edge| edge == (a, b) || edge == (b, a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulator_accepts_everything() {
        let caps = Capabilities::simulator(5);
        assert!(caps.is_simulator);
        assert_eq!(caps.topology.kind, TopologyKind::FullyConnected);
        assert_eq!(caps.topology.edges.len(), 10);
        assert!(caps.gate_set.is_native("ry"));
        assert!(caps.gate_set.is_native("measure"));
    }

    #[test]
    fn test_basis_drops_directives_and_duplicates() {
        let gs = GateSet::from_basis(&["rz", "sx", "measure", "rz", "cz", "barrier"]);
        assert_eq!(gs.native_names(), &["rz", "sx", "cz"]);
        assert!(gs.is_native("barrier"));
        assert!(!gs.is_native("h"));
    }

    #[test]
    fn test_ibm_device_topology() {
        let basis: Vec<String> = vec!["cz".into(), "rz".into(), "sx".into(), "x".into()];
        let caps = Capabilities::ibm("ibm_test", 3, &basis, &[(1, 0), (1, 2)], 100_000);
        assert!(!caps.is_simulator);
        assert_eq!(caps.topology.kind, TopologyKind::Custom);
        assert!(caps.topology.is_connected(0, 1));
        assert!(!caps.topology.is_connected(0, 2));

        let bare = Capabilities::ibm("ibm_small", 3, &basis, &[], 100_000);
        assert_eq!(bare.topology.edges, vec![(0, 1), (1, 2)]);
    }
}
