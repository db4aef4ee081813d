//! Feature generation CLI.
//!
//! Reads the partitions listed in a TOML config, generates features and writes
//! one CSV per partition.
//!
//! Usage: `featurize --config features.toml [--output DIR] [--log-json]`

use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::Parser;
use gridlag::pipeline::{FeaturePipeline, PipelineConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "gridlag=info";

#[derive(Debug, Parser)]
#[command(name = "featurize")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate leakage-free features for half-hourly energy data", long_about = None)]
struct Cli {
    /// Pipeline configuration (TOML)
    #[arg(short, long)]
    config: PathBuf,

    /// Output directory, overriding `output_dir` from the config; relative to
    /// the working directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = PipelineConfig::from_path(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;
    if let Some(output) = cli.output {
        config.output_dir = output;
    }

    let pipeline = FeaturePipeline::new(config).context("building pipeline")?;
    info!(stages = ?pipeline.stage_names(), "starting run");

    let output = pipeline.run_configured()?;
    info!(
        partitions = output.partitions.len(),
        features = output.features.len(),
        output_dir = %pipeline.config().output_dir.display(),
        "run complete"
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            eprintln!("featurize: {err:#}");
            ExitCode::FAILURE
        }
    }
}
