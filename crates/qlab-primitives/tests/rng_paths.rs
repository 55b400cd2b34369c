//! Local and selector-backed RNG paths.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use qlab_adapter_sim::SimulatorBackend;
use qlab_hal::{
    Backend, BackendAvailability, BackendHandle, BackendSelector, Capabilities, Counts,
    EnvTokenProvider, ExecutionResult, FixedSelector, HalError, HalResult, JobId, JobStatus,
    WaitPolicy,
};
use qlab_ir::Circuit;
use qlab_primitives::{
    HardwareOptions, MAX_HARDWARE_BITS, PrimitivesError, RngSample, rng_hardware,
    rng_statevector_with_rng,
};

const UNSET_VAR: &str = "QLAB_TEST_CREDENTIAL_THAT_IS_NEVER_SET";

/// Counts calls, then delegates or fails.
struct CountingSelector {
    calls: AtomicUsize,
    inner: Option<FixedSelector>,
}

impl CountingSelector {
    fn simulator(seed: u64) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            inner: Some(FixedSelector::new(Arc::new(SimulatorBackend::with_seed(seed)))),
        }
    }

    fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            inner: None,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BackendSelector for CountingSelector {
    fn describe(&self) -> &str {
        "counting"
    }

    async fn select_backend(&self) -> HalResult<BackendHandle> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.inner {
            Some(inner) => inner.select_backend().await,
            None => Err(HalError::BackendUnavailable(
                "no operational devices".into(),
            )),
        }
    }
}

/// A 100-qubit device that answers every job with `1` followed by zeros.
struct WideDevice {
    caps: Capabilities,
    submits: AtomicUsize,
    width: AtomicUsize,
}

impl WideDevice {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            caps: Capabilities::simulator(100),
            submits: AtomicUsize::new(0),
            width: AtomicUsize::new(0),
        })
    }

    fn submits(&self) -> usize {
        self.submits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Backend for WideDevice {
    fn name(&self) -> &str {
        "wide"
    }

    fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        Ok(BackendAvailability::always_available())
    }

    async fn submit(&self, circuit: &Circuit, _shots: u32) -> HalResult<JobId> {
        self.submits.fetch_add(1, Ordering::SeqCst);
        let width = match circuit.num_clbits() {
            0 => circuit.num_qubits(),
            n => n,
        };
        self.width.store(width, Ordering::SeqCst);
        Ok(JobId::new("wide-1"))
    }

    async fn status(&self, _job_id: &JobId) -> HalResult<JobStatus> {
        Ok(JobStatus::Completed)
    }

    async fn result(&self, _job_id: &JobId) -> HalResult<ExecutionResult> {
        let width = self.width.load(Ordering::SeqCst);
        let mut counts = Counts::new();
        counts.insert(format!("1{}", "0".repeat(width.saturating_sub(1))), 1);
        Ok(ExecutionResult::new(counts, 1))
    }
}

fn fast_options() -> HardwareOptions {
    HardwareOptions::default().with_wait(WaitPolicy::new(
        Duration::from_millis(5),
        Duration::from_secs(5),
    ))
}

#[tokio::test]
async fn test_missing_credential_never_reaches_selector() {
    let selector = CountingSelector::simulator(1);
    let options = fast_options().with_credential(EnvTokenProvider::new(UNSET_VAR));

    let err = rng_hardware(3, &selector, &options).await.unwrap_err();
    assert!(err.is_configuration(), "unexpected error: {err}");
    assert!(err.to_string().contains(UNSET_VAR));
    assert_eq!(selector.calls(), 0);
}

#[tokio::test]
async fn test_hardware_path_on_simulator() {
    let selector = CountingSelector::simulator(7);
    let sample = rng_hardware(3, &selector, &fast_options()).await.unwrap();

    assert_eq!(sample.num_bits, 3);
    assert_eq!(sample.bitstring.len(), 3);
    assert!(sample.value < 8);
    assert_eq!(
        u64::from_str_radix(&sample.bitstring, 2).unwrap(),
        sample.value
    );
    assert_eq!(selector.calls(), 1);
}

#[tokio::test]
async fn test_present_credential_is_accepted() {
    // PATH is set in every test environment.
    let selector = CountingSelector::simulator(3);
    let options = fast_options().with_credential(EnvTokenProvider::new("PATH"));

    let sample = rng_hardware(5, &selector, &options).await.unwrap();
    assert_eq!(sample.num_bits, 5);
    assert_eq!(selector.calls(), 1);
}

#[tokio::test]
async fn test_selector_failure_is_remote_and_not_retried() {
    let selector = CountingSelector::failing();
    let err = rng_hardware(3, &selector, &fast_options()).await.unwrap_err();

    assert!(matches!(
        err,
        PrimitivesError::Remote(HalError::BackendUnavailable(_))
    ));
    assert_eq!(selector.calls(), 1);
}

#[tokio::test]
async fn test_zero_bits_fails_before_selection() {
    let selector = CountingSelector::simulator(1);
    let err = rng_hardware(0, &selector, &fast_options()).await.unwrap_err();
    assert!(matches!(err, PrimitivesError::Circuit(_)));
    assert_eq!(selector.calls(), 0);
}

#[tokio::test]
async fn test_too_wide_for_a_value_is_rejected_before_submission() {
    let device = WideDevice::new();
    let selector = FixedSelector::new(device.clone());

    let err = rng_hardware(80, &selector, &fast_options()).await.unwrap_err();
    assert!(
        matches!(&err, PrimitivesError::InvalidInput(msg) if msg.contains("80")),
        "unexpected error: {err}"
    );
    assert_eq!(device.submits(), 0);
}

#[tokio::test]
async fn test_widest_value_runs_on_a_wide_device() {
    let device = WideDevice::new();
    let selector = FixedSelector::new(device.clone());

    let sample = rng_hardware(MAX_HARDWARE_BITS, &selector, &fast_options())
        .await
        .unwrap();
    assert_eq!(sample.num_bits, 64);
    assert_eq!(sample.value, 1 << 63);
    assert_eq!(device.submits(), 1);
}

#[tokio::test]
async fn test_too_wide_never_reaches_selector() {
    let selector = CountingSelector::simulator(1);
    let err = rng_hardware(65, &selector, &fast_options()).await.unwrap_err();
    assert!(matches!(err, PrimitivesError::InvalidInput(_)));
    assert_eq!(selector.calls(), 0);
}

#[tokio::test]
async fn test_wider_than_device_fails_in_layout() {
    let selector = FixedSelector::new(Arc::new(SimulatorBackend::with_max_qubits(5)));
    let err = rng_hardware(8, &selector, &fast_options()).await.unwrap_err();
    assert!(
        matches!(&err, PrimitivesError::Circuit(msg) if msg.contains('8')),
        "unexpected error: {err}"
    );
    assert!(!err.is_configuration());
}

#[test]
fn test_three_bit_outcomes_are_uniform() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut histogram = [0u32; 8];
    for _ in 0..8000 {
        let (sample, _) = rng_statevector_with_rng(3, &mut rng).unwrap();
        histogram[sample.value as usize] += 1;
    }
    for (value, &count) in histogram.iter().enumerate() {
        assert!(
            (850..=1150).contains(&count),
            "value {value} drawn {count} times: {histogram:?}"
        );
    }
}

#[test]
fn test_seeded_statevector_is_reproducible() {
    let draw = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..16)
            .map(|_| rng_statevector_with_rng(10, &mut rng).unwrap().0)
            .collect::<Vec<RngSample>>()
    };
    assert_eq!(draw(11), draw(11));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_sample_width_and_range(num_bits in 2u32..=20, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let (sample, circuit) = rng_statevector_with_rng(num_bits, &mut rng).unwrap();
        prop_assert_eq!(sample.bitstring.len(), num_bits as usize);
        prop_assert_eq!(sample.num_bits, num_bits);
        prop_assert!(sample.value < (1u64 << num_bits));
        prop_assert_eq!(circuit.num_qubits(), num_bits as usize);
    }
}
