//! Dense statevector kernel.

use std::f64::consts::FRAC_1_SQRT_2;

use num_complex::Complex64;
use rand::Rng;

use qlab_ir::{Circuit, Instruction, InstructionKind, StandardGate};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// Row-major 2x2 unitary.
type Unitary = [[Complex64; 2]; 2];

fn real(m: [[f64; 2]; 2]) -> Unitary {
    m.map(|row| row.map(|x| Complex64::new(x, 0.0)))
}

/// `2^n` amplitudes; bit `q` of a basis index is the value of qubit `q`.
pub(crate) struct Statevector {
    amps: Vec<Complex64>,
}

impl Statevector {
    /// `|0…0⟩` on `num_qubits` qubits.
    pub(crate) fn new(num_qubits: usize) -> Self {
        let mut amps = vec![ZERO; 1 << num_qubits];
        amps[0] = ONE;
        Self { amps }
    }

    /// Run every gate of `circuit` from `|0…0⟩`. Measurements are terminal
    /// and leave the state alone.
    pub(crate) fn from_circuit(circuit: &Circuit) -> Self {
        let mut state = Self::new(circuit.num_qubits());
        circuit
            .dag()
            .topological_ops()
            .for_each(|(_, inst)| state.apply(inst));
        state
    }

    pub(crate) fn num_qubits(&self) -> usize {
        self.amps.len().trailing_zeros() as usize
    }

    pub(crate) fn apply(&mut self, instruction: &Instruction) {
        let InstructionKind::Gate(gate) = &instruction.kind else {
            return;
        };
        let q = |k: usize| instruction.qubits[k].index();
        match *gate {
            StandardGate::I => {}
            StandardGate::X => self.controlled_flip(0, q(0)),
            StandardGate::Z => self.phase_flip(1 << q(0)),
            StandardGate::H => self.unitary(
                q(0),
                real([[FRAC_1_SQRT_2, FRAC_1_SQRT_2], [FRAC_1_SQRT_2, -FRAC_1_SQRT_2]]),
            ),
            StandardGate::SX => {
                let (p, m) = (Complex64::new(0.5, 0.5), Complex64::new(0.5, -0.5));
                self.unitary(q(0), [[p, m], [m, p]]);
            }
            StandardGate::Ry(theta) => {
                let (s, c) = (theta / 2.0).sin_cos();
                self.unitary(q(0), real([[c, -s], [s, c]]));
            }
            StandardGate::Rz(theta) => {
                let half = theta / 2.0;
                self.diagonal(
                    q(0),
                    Complex64::from_polar(1.0, -half),
                    Complex64::from_polar(1.0, half),
                );
            }
            StandardGate::CX => self.controlled_flip(1 << q(0), q(1)),
            StandardGate::CZ => self.phase_flip((1 << q(0)) | (1 << q(1))),
        }
    }

    /// Walk blocks of `2 * stride`; the lower half has the qubit at 0, the
    /// upper half at 1.
    fn unitary(&mut self, qubit: usize, u: Unitary) {
        let stride = 1 << qubit;
        for block in self.amps.chunks_exact_mut(stride << 1) {
            let (lo, hi) = block.split_at_mut(stride);
            for (a, b) in lo.iter_mut().zip(hi.iter_mut()) {
                (*a, *b) = (u[0][0] * *a + u[0][1] * *b, u[1][0] * *a + u[1][1] * *b);
            }
        }
    }

    fn diagonal(&mut self, qubit: usize, d0: Complex64, d1: Complex64) {
        let mask = 1 << qubit;
        for (i, amp) in self.amps.iter_mut().enumerate() {
            *amp *= if i & mask == 0 { d0 } else { d1 };
        }
    }

    /// Negate every amplitude whose index has all bits of `mask` set.
    fn phase_flip(&mut self, mask: usize) {
        self.amps
            .iter_mut()
            .enumerate()
            .filter(|(i, _)| i & mask == mask)
            .for_each(|(_, amp)| *amp = -*amp);
    }

    /// Flip `target` wherever all bits of `controls` are set. No controls is X.
    fn controlled_flip(&mut self, controls: usize, target: usize) {
        let bit = 1 << target;
        for i in 0..self.amps.len() {
            if i & bit == 0 && i & controls == controls {
                self.amps.swap(i, i | bit);
            }
        }
    }

    pub(crate) fn probabilities(&self) -> Vec<f64> {
        self.amps.iter().map(Complex64::norm_sqr).collect()
    }

    /// Draw one basis index with probability `|amp|^2`.
    pub(crate) fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let mut remaining: f64 = rng.r#gen();
        for (index, amp) in self.amps.iter().enumerate() {
            remaining -= amp.norm_sqr();
            if remaining < 0.0 {
                return index;
            }
        }
        // Accumulated rounding can leave a sliver of probability unassigned.
        self.amps.len() - 1
    }

    /// Exact `⟨Z⊗…⊗Z⟩` over `qubits`.
    pub(crate) fn expectation_z(&self, qubits: &[usize]) -> f64 {
        let mask = qubits.iter().fold(0usize, |m, q| m | (1 << q));
        self.amps
            .iter()
            .enumerate()
            .map(|(i, amp)| match (i & mask).count_ones() % 2 {
                0 => amp.norm_sqr(),
                _ => -amp.norm_sqr(),
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qlab_ir::QubitId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::f64::consts::PI;

    const EPS: f64 = 1e-10;

    fn close(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < EPS
    }

    fn state_of(build: impl FnOnce(&mut Circuit), qubits: u32) -> Statevector {
        let mut circuit = Circuit::with_size("t", qubits, 0);
        build(&mut circuit);
        Statevector::from_circuit(&circuit)
    }

    #[test]
    fn test_starts_in_ground_state() {
        let sv = Statevector::new(3);
        assert_eq!(sv.num_qubits(), 3);
        assert!(close(sv.amps[0], ONE));
        assert!(sv.amps[1..].iter().all(|a| close(*a, ZERO)));
    }

    #[test]
    fn test_hadamard_on_upper_qubit() {
        let sv = state_of(|c| { c.h(QubitId(1)).unwrap(); }, 2);
        let s = Complex64::new(FRAC_1_SQRT_2, 0.0);
        assert!(close(sv.amps[0b00], s));
        assert!(close(sv.amps[0b10], s));
        assert!(close(sv.amps[0b01], ZERO));
    }

    #[test]
    fn test_bell_pair() {
        let sv = state_of(
            |c| { c.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap(); },
            2,
        );
        let probs = sv.probabilities();
        assert!((probs[0b00] - 0.5).abs() < EPS);
        assert!((probs[0b11] - 0.5).abs() < EPS);
        assert!(probs[0b01].abs() < EPS && probs[0b10].abs() < EPS);
        assert!((sv.expectation_z(&[0, 1]) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_cx_respects_direction() {
        let sv = state_of(
            |c| { c.x(QubitId(1)).unwrap().cx(QubitId(0), QubitId(1)).unwrap(); },
            2,
        );
        assert!((sv.probabilities()[0b10] - 1.0).abs() < EPS);
    }

    #[test]
    fn test_sx_squared_is_x() {
        let sv = state_of(|c| { c.sx(QubitId(0)).unwrap().sx(QubitId(0)).unwrap(); }, 1);
        assert!(close(sv.amps[0], ZERO));
        assert!(close(sv.amps[1], ONE));
    }

    #[test]
    fn test_ry_expectation_is_cosine() {
        for theta in [0.0, 0.3, PI / 2.0, 2.0, PI] {
            let sv = state_of(|c| { c.ry(theta, QubitId(0)).unwrap(); }, 1);
            assert!((sv.expectation_z(&[0]) - theta.cos()).abs() < EPS);
        }
    }

    #[test]
    fn test_rz_only_changes_phase() {
        let probs = state_of(
            |c| { c.h(QubitId(0)).unwrap().rz(1.234, QubitId(0)).unwrap(); },
            1,
        )
        .probabilities();
        assert!((probs[0] - 0.5).abs() < EPS);
        assert!((probs[1] - 0.5).abs() < EPS);
    }

    #[test]
    fn test_cz_conjugated_by_h_is_cx() {
        let sv = state_of(
            |c| {
                c.x(QubitId(0))
                    .unwrap()
                    .h(QubitId(1))
                    .unwrap()
                    .cz(QubitId(0), QubitId(1))
                    .unwrap()
                    .h(QubitId(1))
                    .unwrap();
            },
            2,
        );
        assert!((sv.probabilities()[0b11] - 1.0).abs() < EPS);
    }

    #[test]
    fn test_basis_state_always_sampled() {
        let sv = state_of(|c| { c.x(QubitId(0)).unwrap(); }, 1);
        let mut rng = StdRng::seed_from_u64(1);
        assert!((0..100).all(|_| sv.sample(&mut rng) == 1));
    }

    #[test]
    fn test_seeded_draws_repeat() {
        let sv = state_of(|c| { c.h_all().unwrap(); }, 3);
        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..16).map(|_| sv.sample(&mut rng)).collect::<Vec<_>>()
        };
        assert_eq!(draw(9), draw(9));
    }
}
