//! `OpenQASM` 3 emitter for qlab.
//!
//! QASM 3 is the wire format for hardware submission: the IBM adapter
//! serializes transpiled circuits with [`emit_with`] before posting them to
//! the Sampler primitive.
//!
//! | Feature | Example |
//! |---------|---------|
//! | Version declaration | `OPENQASM 3.0;` |
//! | Standard library include | `include "stdgates.inc";` |
//! | Virtual registers | `qubit[5] q;`, `bit[5] c;` |
//! | Physical qubits | `sx $3;` |
//! | Parameterized gates | `rz(pi/2) q[0];` |
//! | Measurements | `c[0] = measure q[0];` |
//! | Barriers | `barrier q[0], q[1];` |
//!
//! # Example
//!
//! ```rust
//! use qlab_ir::{Circuit, QubitId};
//! use qlab_qasm3::emit;
//!
//! let mut circuit = Circuit::with_size("bell", 2, 0);
//! circuit.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let qasm = emit(&circuit).unwrap();
//! assert!(qasm.contains("OPENQASM 3.0;"));
//! assert!(qasm.contains("h q[0];"));
//! assert!(qasm.contains("cx q[0], q[1];"));
//! ```

mod emitter;
mod error;

pub use emitter::{EmitOptions, emit, emit_with};
pub use error::{EmitError, EmitResult};
