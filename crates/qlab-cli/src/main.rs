//! qlab command-line interface.
//!
//! ```text
//! qlab rng --bits 8                      # statevector sampler
//! qlab rng --bits 8 --backend simulator  # transpile + submit to the local backend
//! qlab rng --bits 8 --backend ibm        # least busy IBM Quantum device
//! qlab correlate positive
//! qlab datasets --show xor-health
//! qlab backends
//! ```

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::rng::RngBackend;
use commands::{backends, correlate, datasets, rng, version};

/// qlab - quantum random numbers and quantum correlation
#[derive(Parser)]
#[command(name = "qlab")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a random number from an N-qubit Hadamard circuit
    Rng {
        /// Number of random bits (one qubit each)
        #[arg(short = 'n', long, default_value = "8")]
        bits: u32,

        /// Where to run the circuit
        #[arg(short, long, value_enum, default_value = "statevector")]
        backend: RngBackend,

        /// Transpiler optimization level (0-3)
        #[arg(long, default_value = "3")]
        optimization_level: u8,

        /// Seed for reproducible local sampling
        #[arg(long)]
        seed: Option<u64>,

        /// Print the sample as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare classical and quantum correlation on the demo datasets
    Correlate {
        /// Dataset name or slug (all datasets if omitted)
        dataset: Option<String>,

        /// Dataset generation seed
        #[arg(long, env = "QLAB_DATASET_SEED", default_value = "42")]
        seed: u64,

        /// Print the reports as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the demo datasets
    Datasets {
        /// Dataset generation seed
        #[arg(long, env = "QLAB_DATASET_SEED", default_value = "42")]
        seed: u64,

        /// Print every point of one dataset
        #[arg(long)]
        show: Option<String>,
    },

    /// List available backends
    Backends,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Rng {
            bits,
            backend,
            optimization_level,
            seed,
            json,
        } => rng::execute(bits, backend, optimization_level, seed, json).await,

        Commands::Correlate {
            dataset,
            seed,
            json,
        } => correlate::execute(dataset.as_deref(), seed, json),

        Commands::Datasets { seed, show } => datasets::execute(seed, show.as_deref()),

        Commands::Backends => backends::execute().await,

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
