//! RNG command implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::ValueEnum;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand::rngs::StdRng;

use qlab_adapter_ibm::LeastBusySelector;
use qlab_adapter_sim::SimulatorBackend;
use qlab_hal::{BackendSelector, FixedSelector, HalError};
use qlab_primitives::{
    HardwareOptions, RngSample, rng_hardware, rng_statevector, rng_statevector_with_rng,
};

/// Where the random bits come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RngBackend {
    /// Sample the statevector directly.
    Statevector,
    /// Full hardware pipeline against the local simulator backend.
    Simulator,
    /// Least busy IBM Quantum device.
    Ibm,
}

/// Execute the rng command.
pub async fn execute(
    bits: u32,
    backend: RngBackend,
    optimization_level: u8,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    let sample = match backend {
        RngBackend::Statevector => match seed {
            Some(seed) => rng_statevector_with_rng(bits, &mut StdRng::seed_from_u64(seed))?.0,
            None => rng_statevector(bits)?.0,
        },
        RngBackend::Simulator => {
            let sim = match seed {
                Some(seed) => SimulatorBackend::with_seed(seed),
                None => SimulatorBackend::new(),
            };
            let selector = FixedSelector::new(Arc::new(sim));
            let options = HardwareOptions::default().with_optimization_level(optimization_level);
            run_selected(bits, &selector, &options, json).await?
        }
        RngBackend::Ibm => {
            if seed.is_some() {
                tracing::warn!("--seed has no effect on quantum hardware");
            }
            let options = HardwareOptions::from_env().with_optimization_level(optimization_level);
            let selector = LeastBusySelector::from_env().map_err(HalError::from)?;
            run_selected(bits, &selector, &options, json).await?
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&sample)?);
    } else {
        print_sample(&sample);
    }
    Ok(())
}

async fn run_selected(
    bits: u32,
    selector: &dyn BackendSelector,
    options: &HardwareOptions,
    quiet: bool,
) -> Result<RngSample> {
    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Running {bits}-qubit RNG via {}...", selector.describe()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = rng_hardware(bits, selector, options).await;
    spinner.finish_and_clear();
    Ok(result?)
}

fn print_sample(sample: &RngSample) {
    println!(
        "{} {}-bit random number",
        style("✓").green().bold(),
        sample.num_bits
    );
    println!("  Bitstring: {}", style(&sample.bitstring).cyan());
    println!("  Value:     {}", style(sample.value).yellow().bold());
}
