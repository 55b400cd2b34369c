//! QASM3 emitter for serializing circuits.

use std::f64::consts::PI;
use std::fmt::Write;

use qlab_ir::{Circuit, CircuitLevel, ClbitId, Instruction, InstructionKind, QubitId};

use crate::error::{EmitError, EmitResult};

/// Output switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitOptions {
    /// Add `include "stdgates.inc";` after the version line.
    pub include_stdgates: bool,
}

impl EmitOptions {
    /// Options for remote execution services, which expect the standard
    /// gate library to be included.
    pub fn hardware() -> Self {
        Self {
            include_stdgates: true,
        }
    }
}

/// Emit a circuit as QASM3 source code.
pub fn emit(circuit: &Circuit) -> EmitResult<String> {
    emit_with(circuit, &EmitOptions::default())
}

/// Emit a circuit as QASM3 source code with explicit options.
///
/// Circuits at [`CircuitLevel::Physical`] address hardware qubits directly
/// (`$0`, `$1`, ...) and declare no qubit register.
pub fn emit_with(circuit: &Circuit, options: &EmitOptions) -> EmitResult<String> {
    let mut emitter = Emitter {
        output: String::new(),
        physical: circuit.dag().level() == CircuitLevel::Physical,
    };
    emitter.emit_circuit(circuit, options)?;
    Ok(emitter.output)
}

struct Emitter {
    output: String,
    physical: bool,
}

impl Emitter {
    fn emit_circuit(&mut self, circuit: &Circuit, options: &EmitOptions) -> EmitResult<()> {
        writeln!(self.output, "OPENQASM 3.0;")?;
        if options.include_stdgates {
            writeln!(self.output, "include \"stdgates.inc\";")?;
        }
        writeln!(self.output)?;

        let num_qubits = circuit.num_qubits();
        let num_clbits = circuit.num_clbits();
        if num_qubits > 0 && !self.physical {
            writeln!(self.output, "qubit[{num_qubits}] q;")?;
        }
        if num_clbits > 0 {
            writeln!(self.output, "bit[{num_clbits}] c;")?;
        }
        if (num_qubits > 0 && !self.physical) || num_clbits > 0 {
            writeln!(self.output)?;
        }

        for (_, instruction) in circuit.dag().topological_ops() {
            self.emit_instruction(instruction)?;
        }
        Ok(())
    }

    fn emit_instruction(&mut self, instruction: &Instruction) -> EmitResult<()> {
        match &instruction.kind {
            InstructionKind::Gate(gate) => {
                let qubits = self.qubits(&instruction.qubits);
                match gate.angle() {
                    Some(theta) => {
                        writeln!(self.output, "{}({}) {qubits};", gate.name(), emit_param(theta))?;
                    }
                    None => writeln!(self.output, "{} {qubits};", gate.name())?,
                }
            }

            InstructionKind::Measure => {
                if instruction.qubits.len() != instruction.clbits.len() {
                    return Err(EmitError::Unsupported(format!(
                        "measure of {} qubits into {} bits",
                        instruction.qubits.len(),
                        instruction.clbits.len()
                    )));
                }
                for (q, c) in instruction.qubits.iter().zip(&instruction.clbits) {
                    let qubit = self.qubit(*q);
                    writeln!(self.output, "{} = measure {qubit};", clbit(*c))?;
                }
            }

            InstructionKind::Barrier => {
                let qubits = self.qubits(&instruction.qubits);
                if qubits.is_empty() {
                    writeln!(self.output, "barrier;")?;
                } else {
                    writeln!(self.output, "barrier {qubits};")?;
                }
            }
        }
        Ok(())
    }

    fn qubit(&self, q: QubitId) -> String {
        if self.physical {
            format!("${}", q.0)
        } else {
            format!("q[{}]", q.0)
        }
    }

    fn qubits(&self, qubits: &[QubitId]) -> String {
        qubits
            .iter()
            .map(|q| self.qubit(*q))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn clbit(c: ClbitId) -> String {
    format!("c[{}]", c.0)
}

fn emit_param(v: f64) -> String {
    const FRACTIONS: [(f64, &str); 6] = [
        (PI, "pi"),
        (PI / 2.0, "pi/2"),
        (PI / 4.0, "pi/4"),
        (-PI, "-pi"),
        (-PI / 2.0, "-pi/2"),
        (-PI / 4.0, "-pi/4"),
    ];
    FRACTIONS
        .iter()
        .find(|(value, _)| (v - value).abs() < 1e-10)
        .map_or_else(|| format!("{v:.15}"), |(_, text)| (*text).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qlab_compile::{BasisGates, CouplingMap, PassManagerBuilder};
    use qlab_ir::CircuitDag;

    #[test]
    fn test_emit_rng_circuit() {
        let mut circuit = Circuit::with_size("rng", 3, 0);
        circuit.h_all().unwrap().measure_all().unwrap();

        let qasm = emit(&circuit).unwrap();
        let expected = "OPENQASM 3.0;\n\nqubit[3] q;\nbit[3] c;\n\n\
                        h q[0];\nh q[1];\nh q[2];\n\
                        c[0] = measure q[0];\nc[1] = measure q[1];\nc[2] = measure q[2];\n";
        assert_eq!(qasm, expected);
    }

    #[test]
    fn test_emit_parameterized() {
        let mut circuit = Circuit::with_size("rot", 1, 0);
        circuit
            .rz(PI / 2.0, QubitId(0))
            .unwrap()
            .ry(0.3, QubitId(0))
            .unwrap()
            .rz(-PI, QubitId(0))
            .unwrap();

        let qasm = emit(&circuit).unwrap();
        assert!(qasm.contains("rz(pi/2) q[0];"));
        assert!(qasm.contains("ry(0.300000000000000) q[0];"));
        assert!(qasm.contains("rz(-pi) q[0];"));
    }

    #[test]
    fn test_emit_stdgates_include() {
        let circuit = Circuit::with_size("empty", 1, 0);
        let qasm = emit_with(&circuit, &EmitOptions::hardware()).unwrap();
        assert!(qasm.starts_with("OPENQASM 3.0;\ninclude \"stdgates.inc\";\n"));
    }

    #[test]
    fn test_emit_barrier() {
        let mut circuit = Circuit::with_size("b", 2, 0);
        circuit.barrier_all().unwrap();
        let qasm = emit(&circuit).unwrap();
        assert!(qasm.contains("barrier q[0], q[1];"));
    }

    #[test]
    fn test_emit_physical_circuit() {
        let mut circuit = Circuit::with_size("rng", 2, 0);
        circuit.h_all().unwrap().measure_all().unwrap();

        let (pm, mut props) = PassManagerBuilder::new()
            .with_optimization_level(3)
            .with_target(CouplingMap::linear(4), BasisGates::heron())
            .build();
        let mut dag: CircuitDag = circuit.into_dag();
        pm.run(&mut dag, &mut props).unwrap();
        let compiled = Circuit::from_dag("rng", dag);

        let qasm = emit_with(&compiled, &EmitOptions::hardware()).unwrap();
        assert!(!qasm.contains("qubit["));
        assert!(qasm.contains("bit[2] c;"));
        assert!(qasm.contains("sx $1;"));
        assert!(qasm.contains("c[1] = measure $1;"));
        assert!(!qasm.lines().any(|line| line.starts_with("h ")));
    }
}
