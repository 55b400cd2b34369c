//! qlab transpilation framework.
//!
//! Circuits built from the high-level gate set (H, RY, CX, ...) are lowered
//! to what IBM hardware accepts before submission. The work is split into
//! passes run in order by a [`PassManager`]:
//!
//! 1. **Layout**: map virtual qubits onto physical qubits
//! 2. **Connectivity check**: reject two-qubit gates on uncoupled pairs
//! 3. **Translation**: rewrite gates into the target basis
//! 4. **Optimization**: merge rotations and cancel self-inverse pairs
//!
//! ```text
//! Input Circuit
//!       │
//!       ▼
//! ┌─────────────┐
//! │ PassManager │ ◄── PropertySet (coupling map, basis gates, layout)
//! └─────────────┘
//!       │
//!       ├── TrivialLayout
//!       ├── CheckConnectivity
//!       ├── BasisTranslation
//!       └── Optimize1qGates / CancelCX
//!       │
//!       ▼
//! Output Circuit (hardware-compatible)
//! ```
//!
//! # Example
//!
//! ```rust
//! use qlab_compile::{BasisGates, CouplingMap, PassManagerBuilder};
//! use qlab_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("rng", 3, 0);
//! circuit.h_all().unwrap().measure_all().unwrap();
//!
//! let (pm, mut props) = PassManagerBuilder::new()
//!     .with_optimization_level(3)
//!     .with_target(CouplingMap::linear(5), BasisGates::heron())
//!     .build();
//!
//! let mut dag = circuit.into_dag();
//! pm.run(&mut dag, &mut props).unwrap();
//! assert_eq!(dag.count_ops("h"), 0);
//! ```
//!
//! # Optimization Levels
//!
//! | Level | Passes Included |
//! |-------|-----------------|
//! | 0 | Layout + translation only |
//! | 1 | + 1q rotation merging |
//! | 2 | + CX/CZ pair cancellation |
//! | 3 | + a second 1q merge over the cancelled circuit |

pub mod error;
pub mod manager;
pub mod pass;
pub mod passes;
pub mod property;

pub use error::{CompileError, CompileResult};
pub use manager::{MAX_OPTIMIZATION_LEVEL, PassManager, PassManagerBuilder};
pub use pass::{Pass, PassKind, PassRecord};
pub use property::{BasisGates, CouplingMap, Layout, PropertySet};
