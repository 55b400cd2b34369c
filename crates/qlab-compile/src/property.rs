//! Target description and the facts passes hand to each other.
//!
//! ```
//! use qlab_compile::{BasisGates, CouplingMap, PropertySet};
//!
//! let props = PropertySet::new().with_target(CouplingMap::linear(5), BasisGates::heron());
//!
//! assert!(props.coupling_map.as_ref().unwrap().is_connected(1, 0));
//! assert!(props.basis_gates.as_ref().unwrap().contains("cz"));
//! ```

use rustc_hash::FxHashSet;

use qlab_ir::QubitId;

/// Physical qubit for each virtual qubit, indexed by the virtual index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layout {
    physical: Vec<u32>,
}

impl Layout {
    /// Virtual qubit `i` on physical qubit `i`.
    pub fn trivial(num_qubits: u32) -> Self {
        Self {
            physical: (0..num_qubits).collect(),
        }
    }

    pub fn get_physical(&self, qubit: QubitId) -> Option<u32> {
        self.physical.get(qubit.index()).copied()
    }

    pub fn len(&self) -> usize {
        self.physical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.physical.is_empty()
    }
}

fn undirected(a: u32, b: u32) -> (u32, u32) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Which physical qubit pairs share a coupler.
///
/// IBM devices report both directions of every coupler, so pairs are
/// stored undirected and the first direction seen is kept in `edges`.
#[derive(Debug, Clone)]
pub struct CouplingMap {
    num_qubits: u32,
    edges: Vec<(u32, u32)>,
    pairs: FxHashSet<(u32, u32)>,
}

impl CouplingMap {
    pub fn from_edges(num_qubits: u32, edges: &[(u32, u32)]) -> Self {
        let mut map = Self {
            num_qubits,
            edges: Vec::with_capacity(edges.len()),
            pairs: FxHashSet::default(),
        };
        for &(a, b) in edges {
            map.add_edge(a, b);
        }
        map
    }

    /// Chain `0-1-2-...-(n-1)`.
    pub fn linear(n: u32) -> Self {
        let chain: Vec<_> = (1..n).map(|i| (i - 1, i)).collect();
        Self::from_edges(n, &chain)
    }

    /// Every pair coupled.
    pub fn full(n: u32) -> Self {
        let all: Vec<_> = (0..n)
            .flat_map(|a| ((a + 1)..n).map(move |b| (a, b)))
            .collect();
        Self::from_edges(n, &all)
    }

    pub fn add_edge(&mut self, a: u32, b: u32) {
        if self.pairs.insert(undirected(a, b)) {
            self.edges.push((a, b));
        }
    }

    pub fn is_connected(&self, a: u32, b: u32) -> bool {
        self.pairs.contains(&undirected(a, b))
    }

    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }
}

/// Gate names the target executes natively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasisGates {
    gates: Vec<String>,
}

impl BasisGates {
    pub fn new(gates: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            gates: gates.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, gate: &str) -> bool {
        self.gates.iter().any(|g| g == gate)
    }

    pub fn gates(&self) -> &[String] {
        &self.gates
    }

    /// Eagle-generation IBM devices (CX entangler).
    pub fn ibm() -> Self {
        Self::new(["rz", "sx", "x", "cx", "id", "measure", "barrier"])
    }

    /// Heron-generation IBM devices (CZ entangler).
    pub fn heron() -> Self {
        Self::new(["rz", "sx", "x", "cz", "id", "measure", "barrier"])
    }
}

/// State threaded through a pass run.
///
/// The caller fills in the target half (`coupling_map`, `basis_gates`);
/// the layout pass fills in `layout`.
#[derive(Debug, Clone, Default)]
pub struct PropertySet {
    pub layout: Option<Layout>,
    pub coupling_map: Option<CouplingMap>,
    pub basis_gates: Option<BasisGates>,
}

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_target(mut self, coupling_map: CouplingMap, basis_gates: BasisGates) -> Self {
        self.coupling_map = Some(coupling_map);
        self.basis_gates = Some(basis_gates);
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }
}
