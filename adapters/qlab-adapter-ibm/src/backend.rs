//! IBM Quantum backend implementation.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use tracing::{debug, info, instrument, warn};

use qlab_hal::{
    Backend, BackendAvailability, Capabilities, Counts, ExecutionResult, HalError, HalResult,
    JobId, JobStatus,
};
use qlab_ir::Circuit;
use qlab_qasm3::{EmitOptions, emit_with};

use crate::api::{BackendInfo, IbmClient, RemoteJob, SamplerOutput};
use crate::error::{IbmError, IbmResult};

/// Shot limit used when a device does not report one.
const DEFAULT_MAX_SHOTS: u32 = 100_000;

/// What the backend remembers about a job it submitted.
#[derive(Debug, Clone, Copy)]
struct SubmittedJob {
    /// Bitstring width: classical bits of the submitted circuit.
    num_bits: usize,
    shots: u32,
    submitted_at: DateTime<Utc>,
}

/// One IBM Quantum device.
///
/// Circuits must already be expressed in the device's native gate set.
pub struct IbmBackend {
    client: Arc<IbmClient>,
    info: BackendInfo,
    capabilities: Capabilities,
    jobs: Mutex<FxHashMap<String, SubmittedJob>>,
}

impl IbmBackend {
    /// Wrap a device described by `info`.
    pub fn new(client: Arc<IbmClient>, info: BackendInfo) -> Self {
        let capabilities = Capabilities::ibm(
            &info.name,
            info.num_qubits,
            &info.basis_gates,
            &info.coupling_map,
            info.max_shots.unwrap_or(DEFAULT_MAX_SHOTS),
        );
        Self {
            client,
            info,
            capabilities,
            jobs: Mutex::new(FxHashMap::default()),
        }
    }

    /// Device description captured at selection time.
    pub fn info(&self) -> &BackendInfo {
        &self.info
    }

    fn first_non_native_gate<'a>(&self, circuit: &'a Circuit) -> Option<&'a str> {
        let gate_set = &self.capabilities.gate_set;
        circuit
            .dag()
            .topological_ops()
            .filter_map(|(_, inst)| inst.as_gate())
            .map(|gate| gate.name())
            .find(|name| !gate_set.is_native(name))
    }

    fn circuit_to_qasm(circuit: &Circuit) -> IbmResult<String> {
        emit_with(circuit, &EmitOptions::hardware()).map_err(|e| IbmError::Circuit(e.to_string()))
    }

    fn submitted(&self, job_id: &JobId) -> Option<SubmittedJob> {
        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&job_id.0)
            .copied()
    }
}

#[async_trait]
impl Backend for IbmBackend {
    fn name(&self) -> &str {
        &self.info.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        match self.client.get_backend(&self.info.name).await {
            Ok(info) if info.status.operational => Ok(BackendAvailability {
                is_available: true,
                queue_depth: Some(info.status.pending_jobs),
                status_message: info.status.status_msg,
            }),
            Ok(info) => Ok(BackendAvailability::unavailable(
                info.status
                    .status_msg
                    .unwrap_or_else(|| "backend offline".to_string()),
            )),
            Err(e) => {
                warn!(backend = %self.info.name, error = %e, "availability check failed");
                Ok(BackendAvailability::unavailable("failed to query backend"))
            }
        }
    }

    #[instrument(skip(self, circuit), fields(backend = %self.info.name, circuit = circuit.name()))]
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        if shots == 0 || shots > self.capabilities.max_shots {
            return Err(HalError::InvalidShots(format!(
                "{shots} shots requested, backend accepts 1..={}",
                self.capabilities.max_shots
            )));
        }
        if circuit.num_qubits() > self.capabilities.num_qubits as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit requires {} qubits but backend only has {}",
                circuit.num_qubits(),
                self.capabilities.num_qubits
            )));
        }
        if let Some(gate) = self.first_non_native_gate(circuit) {
            return Err(HalError::InvalidCircuit(format!(
                "gate '{gate}' is not native on {}; transpile first",
                self.info.name
            )));
        }

        let qasm = Self::circuit_to_qasm(circuit)?;
        let remote_id = self
            .client
            .submit_sampler_job(&self.info.name, &qasm, shots)
            .await
            .map_err(|e| match e {
                IbmError::Api { .. } => HalError::SubmissionFailed(e.to_string()),
                other => other.into(),
            })?;

        let num_bits = match circuit.num_clbits() {
            0 => circuit.num_qubits(),
            n => n,
        };
        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                remote_id.clone(),
                SubmittedJob {
                    num_bits,
                    shots,
                    submitted_at: Utc::now(),
                },
            );

        info!(job_id = %remote_id, shots, num_bits, "submitted sampler job");
        Ok(JobId(remote_id))
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        let status = self.client.get_job_status(&job_id.0).await?;
        let job_status = map_status(&status);
        debug!(%job_id, remote = %status.status, %job_status, "polled job");
        Ok(job_status)
    }

    #[instrument(skip(self), fields(backend = %self.info.name))]
    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let status = self.client.get_job_status(&job_id.0).await?;
        match map_status(&status) {
            JobStatus::Completed => {}
            JobStatus::Failed(msg) => return Err(HalError::JobFailed(msg)),
            JobStatus::Cancelled => return Err(HalError::JobCancelled),
            JobStatus::Queued | JobStatus::Running => {
                return Err(HalError::Backend(format!(
                    "Job {} not yet completed",
                    job_id.0
                )));
            }
        }

        let results = self.client.get_job_results(&job_id.0).await?;
        let submitted = self.submitted(job_id);
        let width = submitted.map(|job| job.num_bits);
        let counts = results_to_counts(&results, width, submitted.map(|job| job.shots))?;
        let shots = submitted.map_or_else(
            || u32::try_from(counts.total_shots()).unwrap_or(u32::MAX),
            |job| job.shots,
        );

        let mut result = ExecutionResult::new(counts, shots).with_backend(&self.info.name);
        if let Some(job) = submitted {
            let elapsed = (Utc::now() - job.submitted_at).num_milliseconds();
            result = result.with_execution_time(u64::try_from(elapsed).unwrap_or(0));
        }
        Ok(result)
    }
}

/// Map a remote status string onto [`JobStatus`]. Unknown states count as running.
fn map_status(status: &RemoteJob) -> JobStatus {
    match status.state_name().as_str() {
        "QUEUED" => JobStatus::Queued,
        "VALIDATING" | "RUNNING" => JobStatus::Running,
        "COMPLETED" | "DONE" => JobStatus::Completed,
        "FAILED" | "ERROR" => JobStatus::Failed(
            status
                .failure_reason()
                .unwrap_or("Unknown error")
                .to_owned(),
        ),
        "CANCELLED" => JobStatus::Cancelled,
        _ => JobStatus::Running,
    }
}

/// Build a histogram from the first PUB result.
///
/// SamplerV2 `samples` are preferred. Pre-aggregated `counts` and then
/// `quasi_dists` are used when no samples are present.
fn results_to_counts(
    results: &SamplerOutput,
    width: Option<usize>,
    shots: Option<u32>,
) -> IbmResult<Counts> {
    let result = results
        .results
        .first()
        .ok_or_else(|| IbmError::MalformedResult("result list is empty".into()))?;

    if let Some(data) = &result.data {
        // A single classical register is emitted; pick the first by name if several.
        let mut registers: Vec<_> = data.iter().collect();
        registers.sort_unstable_by(|a, b| a.0.cmp(b.0));
        if let Some((_, register)) = registers.into_iter().find(|(_, r)| !r.samples.is_empty()) {
            let mut counts = Counts::new();
            for sample in &register.samples {
                counts.insert(decode_outcome(sample, width)?, 1);
            }
            return Ok(counts);
        }
    }

    if let Some(raw) = &result.counts {
        let mut counts = Counts::new();
        for (outcome, &count) in raw {
            counts.insert(decode_outcome(outcome, width)?, count);
        }
        return Ok(counts);
    }

    if let Some(dist) = result.quasi_dists.as_ref().and_then(|d| d.first()) {
        let effective_shots = shots.map(u64::from).or_else(|| {
            result
                .metadata
                .as_ref()
                .and_then(|m| m.get("shots"))
                .and_then(serde_json::Value::as_u64)
        });
        let effective_shots = effective_shots.unwrap_or(1) as f64;
        let mut counts = Counts::new();
        for (outcome, &prob) in dist {
            let count = (prob * effective_shots).max(0.0).round() as u64;
            if count > 0 {
                counts.insert(decode_outcome(outcome, width)?, count);
            }
        }
        return Ok(counts);
    }

    Err(IbmError::MalformedResult(
        "no samples, counts or quasi_dists in result".into(),
    ))
}

/// Decode one outcome (`"0x5"` or `"101"`) into a bitstring.
///
/// With a known width the result is zero-padded to exactly `width` bits.
/// Values needing more than `width` bits are rejected.
fn decode_outcome(outcome: &str, width: Option<usize>) -> IbmResult<String> {
    let malformed = || IbmError::MalformedResult(format!("cannot decode outcome '{outcome}'"));

    let bits: String = if let Some(hex) = outcome
        .strip_prefix("0x")
        .or_else(|| outcome.strip_prefix("0X"))
    {
        if hex.is_empty() {
            return Err(malformed());
        }
        let mut bits = String::with_capacity(hex.len() * 4);
        for c in hex.chars() {
            let digit = c.to_digit(16).ok_or_else(malformed)?;
            bits.push_str(&format!("{digit:04b}"));
        }
        bits
    } else if !outcome.is_empty() && outcome.chars().all(|c| c == '0' || c == '1') {
        outcome.to_string()
    } else {
        return Err(malformed());
    };

    let significant = bits.trim_start_matches('0');
    match width {
        Some(width) if significant.len() > width => Err(IbmError::MalformedResult(format!(
            "outcome '{outcome}' does not fit in {width} bits"
        ))),
        Some(width) => Ok(format!("{significant:0>width$}")),
        None if significant.is_empty() => Ok("0".to_string()),
        None => Ok(significant.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{PubResult, RegisterSamples};
    use std::collections::HashMap;

    fn sampler_result(samples: &[&str]) -> SamplerOutput {
        let mut data = HashMap::new();
        data.insert(
            "c".to_string(),
            RegisterSamples {
                samples: samples.iter().map(|s| (*s).to_string()).collect(),
            },
        );
        SamplerOutput {
            results: vec![PubResult {
                data: Some(data),
                counts: None,
                quasi_dists: None,
                metadata: None,
            }],
        }
    }

    #[test]
    fn test_decode_hex_pads_to_width() {
        assert_eq!(decode_outcome("0x5", Some(3)).unwrap(), "101");
        assert_eq!(decode_outcome("0x5", Some(5)).unwrap(), "00101");
        assert_eq!(decode_outcome("0x0", Some(4)).unwrap(), "0000");
        assert_eq!(decode_outcome("0xff", Some(8)).unwrap(), "11111111");
        assert_eq!(decode_outcome("0x1", Some(15)).unwrap(), "000000000000001");
    }

    #[test]
    fn test_decode_binary_passthrough() {
        assert_eq!(decode_outcome("11", Some(4)).unwrap(), "0011");
        assert_eq!(decode_outcome("0011", None).unwrap(), "11");
        assert_eq!(decode_outcome("0x0", None).unwrap(), "0");
    }

    #[test]
    fn test_decode_rejects_overflow_and_garbage() {
        assert!(matches!(
            decode_outcome("0x8", Some(3)),
            Err(IbmError::MalformedResult(_))
        ));
        assert!(decode_outcome("0xzz", Some(3)).is_err());
        assert!(decode_outcome("0x", Some(3)).is_err());
        assert!(decode_outcome("12", Some(3)).is_err());
    }

    #[test]
    fn test_samples_to_counts() {
        let results = sampler_result(&["0x0", "0x3", "0x0", "0x3", "0x0"]);
        let counts = results_to_counts(&results, Some(2), Some(5)).unwrap();
        assert_eq!(counts.get("00"), 3);
        assert_eq!(counts.get("11"), 2);
        assert_eq!(counts.total_shots(), 5);
    }

    #[test]
    fn test_counts_fallback() {
        let mut raw = HashMap::new();
        raw.insert("0x0".to_string(), 500u64);
        raw.insert("0x3".to_string(), 500u64);
        let results = SamplerOutput {
            results: vec![PubResult {
                data: None,
                counts: Some(raw),
                quasi_dists: None,
                metadata: None,
            }],
        };
        let counts = results_to_counts(&results, Some(4), None).unwrap();
        assert_eq!(counts.get("0000"), 500);
        assert_eq!(counts.get("0011"), 500);
    }

    #[test]
    fn test_quasi_dists_fallback_uses_shots() {
        let mut dist = HashMap::new();
        dist.insert("0x1".to_string(), 0.25);
        dist.insert("0x2".to_string(), 0.75);
        let results = SamplerOutput {
            results: vec![PubResult {
                data: Some(HashMap::new()),
                counts: None,
                quasi_dists: Some(vec![dist]),
                metadata: None,
            }],
        };
        let counts = results_to_counts(&results, Some(2), Some(100)).unwrap();
        assert_eq!(counts.get("01"), 25);
        assert_eq!(counts.get("10"), 75);
    }

    #[test]
    fn test_empty_result_is_malformed() {
        let results = SamplerOutput { results: vec![] };
        assert!(matches!(
            results_to_counts(&results, Some(3), Some(1)),
            Err(IbmError::MalformedResult(_))
        ));

        let results = sampler_result(&[]);
        assert!(results_to_counts(&results, Some(3), Some(1)).is_err());
    }

    #[test]
    fn test_map_status_is_case_insensitive() {
        let status = |s: &str| RemoteJob {
            id: "job".into(),
            status: s.into(),
            state: None,
            error: None,
        };
        assert_eq!(map_status(&status("Queued")), JobStatus::Queued);
        assert_eq!(map_status(&status("Running")), JobStatus::Running);
        assert_eq!(map_status(&status("VALIDATING")), JobStatus::Running);
        assert_eq!(map_status(&status("Completed")), JobStatus::Completed);
        assert_eq!(map_status(&status("Cancelled")), JobStatus::Cancelled);
        assert_eq!(
            map_status(&status("Failed")),
            JobStatus::Failed("Unknown error".into())
        );
    }
}
