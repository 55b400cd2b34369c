//! Shot sampling with a caller-supplied random source.

use rand::Rng;

use qlab_hal::{Counts, HalError, HalResult};
use qlab_ir::{Circuit, InstructionKind};

use crate::simulator::MAX_QUBITS;
use crate::statevector::Statevector;

/// Synchronous shot sampler.
///
/// Unlike [`crate::SimulatorBackend`] there is no job bookkeeping: the
/// circuit is simulated and sampled in place, and the caller owns the
/// random source.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sampler {
    _private: (),
}

impl Sampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample `shots` measurement outcomes.
    pub fn run<R: Rng + ?Sized>(
        &self,
        circuit: &Circuit,
        shots: u32,
        rng: &mut R,
    ) -> HalResult<Counts> {
        if circuit.num_qubits() > MAX_QUBITS as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {} qubits but simulator only supports {}",
                circuit.num_qubits(),
                MAX_QUBITS
            )));
        }
        if shots == 0 {
            return Err(HalError::InvalidShots("0 (must be at least 1)".into()));
        }
        Ok(sample_counts(circuit, shots, rng))
    }

    /// Sample a single shot and return its bitstring.
    pub fn sample_once<R: Rng + ?Sized>(&self, circuit: &Circuit, rng: &mut R) -> HalResult<String> {
        let counts = self.run(circuit, 1, rng)?;
        counts
            .most_frequent()
            .map(|(bitstring, _)| bitstring.to_string())
            .ok_or_else(|| HalError::Backend("sampler produced no outcome".into()))
    }
}

pub(crate) fn sample_counts<R: Rng + ?Sized>(circuit: &Circuit, shots: u32, rng: &mut R) -> Counts {
    let sv = Statevector::from_circuit(circuit);
    let readout = Readout::for_circuit(circuit);

    let mut counts = Counts::new();
    for _ in 0..shots {
        counts.insert(readout.bitstring(sv.sample(&mut *rng)), 1);
    }
    counts
}

/// Maps a sampled basis state onto classical bits.
///
/// Bitstrings are printed with the highest classical bit first. A circuit
/// without measurements reads out every qubit in order.
struct Readout {
    pairs: Vec<(usize, usize)>,
    width: usize,
}

impl Readout {
    fn for_circuit(circuit: &Circuit) -> Self {
        let pairs: Vec<(usize, usize)> = circuit
            .dag()
            .topological_ops()
            .filter(|(_, inst)| matches!(inst.kind, InstructionKind::Measure))
            .flat_map(|(_, inst)| {
                inst.qubits
                    .iter()
                    .zip(&inst.clbits)
                    .map(|(q, c)| (q.0 as usize, c.0 as usize))
            })
            .collect();

        if pairs.is_empty() {
            let n = circuit.num_qubits();
            return Self {
                pairs: (0..n).map(|q| (q, q)).collect(),
                width: n,
            };
        }

        Self {
            pairs,
            width: circuit.num_clbits(),
        }
    }

    fn bitstring(&self, outcome: usize) -> String {
        let mut bits = vec![b'0'; self.width];
        for &(qubit, clbit) in &self.pairs {
            if (outcome >> qubit) & 1 == 1 {
                bits[self.width - 1 - clbit] = b'1';
            }
        }
        bits.into_iter().map(char::from).collect()
    }
}
