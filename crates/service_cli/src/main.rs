//! xsec CLI - Command Line Driver for the Cross-Section Pipeline
//!
//! One subcommand per pipeline stage. Stages share state through the archive
//! directory named in the configuration, so each can run as its own process.
//!
//! # Commands
//!
//! - `xsec build <table>` - Build and store the surface of one tabulated file
//! - `xsec interpolate <min> <max> <spacing> <n>` - Fill energy gaps with interpolated surfaces
//! - `xsec flux` - Flux-weight the surface family against the SNS spectrum
//! - `xsec sample [events]` - Draw events from the flux-weighted surface
//! - `xsec list` - List archive entries
//!
//! # Architecture
//!
//! As part of the **S**ervice layer in the A-I-X-S architecture, this crate
//! wires the loader, configuration and file-backed archive to the kernel
//! stages. Any error prints a diagnostic and exits with status 1.

use clap::{Parser, Subcommand, ValueEnum};
use infra_config::{PipelineConfig, DEFAULT_CONFIG_PATH};
use infra_store::JsonArchive;
use std::path::PathBuf;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use xsec_core::math::Normalization;
use xsec_core::stages::InterpolationPlan;

mod commands;
mod error;

pub use error::{CliError, Result};

/// Cross-section surface pipeline
#[derive(Parser, Debug)]
#[command(name = "xsec")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the surface of one tabulated cross-section file
    Build {
        /// Path to the table
        input: PathBuf,
    },

    /// Synthesise surfaces between stored incident energies
    Interpolate {
        /// Lowest stored incident energy (MeV)
        param_min: f64,

        /// Highest stored incident energy (MeV)
        param_max: f64,

        /// Spacing of the stored energies (MeV)
        param_spacing: f64,

        /// Surfaces synthesised per gap
        n_interps: usize,
    },

    /// Flux-weight the surface family against the SNS spectrum
    Flux {
        /// Override the configured normalisation
        #[arg(short, long, value_enum)]
        normalization: Option<NormalizationArg>,
    },

    /// Draw random events from the flux-weighted surface
    Sample {
        /// Number of events (default from configuration)
        events: Option<usize>,

        /// Fixed seed for a reproducible run
        #[arg(short, long)]
        seed: Option<u64>,

        /// Event file (default from configuration)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List archive entries
    List,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum NormalizationArg {
    /// Divide by the integral of the weight over the sampled energies
    WeightIntegral,
    /// Divide by the upper edge of the spectrum
    DomainMax,
}

impl From<NormalizationArg> for Normalization {
    fn from(arg: NormalizationArg) -> Self {
        match arg {
            NormalizationArg::WeightIntegral => Normalization::WeightIntegral,
            NormalizationArg::DomainMax => Normalization::DomainMax,
        }
    }
}

fn init_tracing(config: &PipelineConfig, verbose: bool) {
    let default_level = if verbose { "debug" } else { config.log_level.as_str() };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = PipelineConfig::load_with_env_and_validate(&cli.config)?;
    init_tracing(&config, cli.verbose);
    debug!(config = %cli.config.display(), archive = %config.archive.path.display(), "Configuration loaded");

    let mut archive = JsonArchive::open(&config.archive.path)?;

    match cli.command {
        Commands::Build { input } => commands::build::run(&config, &mut archive, &input).map(drop),
        Commands::Interpolate {
            param_min,
            param_max,
            param_spacing,
            n_interps,
        } => {
            let plan = InterpolationPlan {
                param_min,
                param_max,
                spacing: param_spacing,
                n_interps,
            };
            commands::interpolate::run(&mut archive, &plan).map(drop)
        }
        Commands::Flux { normalization } => {
            commands::flux::run(&config, &mut archive, normalization.map(Normalization::from))
                .map(drop)
        }
        Commands::Sample {
            events,
            seed,
            output,
        } => commands::sample::run(&config, &archive, events, seed, output.as_deref()).map(drop),
        Commands::List => commands::list::run(&archive),
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version are not failures
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    if let Err(e) = run(cli) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
