//! Circuit representation for qlab.
//!
//! The lab only ever builds two shapes of circuit: an all-Hadamard register
//! measured once for random bits, and a two-qubit RY feature map with an
//! optional CX for correlation estimates. [`Circuit`] is the builder for
//! both; it validates every operation into a [`CircuitDag`], which the
//! transpiler, simulator and QASM emitter consume.
//!
//! ```rust
//! use qlab_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("rng", 3, 0);
//! circuit.h_all()?.measure_all()?;
//!
//! assert_eq!(circuit.num_clbits(), 3);
//! assert_eq!(circuit.depth(), 2);
//!
//! let mut map = Circuit::with_size("feature_map", 2, 0);
//! map.ry(0.4, QubitId(0))?.ry(1.1, QubitId(1))?.cx(QubitId(0), QubitId(1))?;
//! assert_eq!(map.dag().count_ops("ry"), 2);
//! # Ok::<(), qlab_ir::IrError>(())
//! ```
//!
//! | Gate | Qubits | Notes |
//! |------|--------|-------|
//! | `id`, `x`, `z`, `h` | 1 | |
//! | `sx` | 1 | IBM native |
//! | `ry(θ)`, `rz(θ)` | 1 | `rz` is IBM native |
//! | `cx` | 2 | Eagle entangler |
//! | `cz` | 2 | Heron entangler |

pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use dag::{CircuitDag, CircuitLevel, DagEdge, DagNode, NodeIndex, WireId};
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{ClbitId, QubitId};
