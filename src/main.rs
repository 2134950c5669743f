use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use padded_perceptron::runner::{self, RunOptions};
use padded_perceptron::LogSink;

/// Trains a fully-connected perceptron described by a JSON run configuration.
#[derive(Parser)]
#[command(name = "padded-perceptron", version, about, long_about = None)]
struct Cli {
    /// Run configuration (JSON)
    config: PathBuf,

    /// Text log path [default: log<config file name> next to the config]
    #[arg(short, long)]
    log: Option<PathBuf>,

    /// Also write the final report as JSON
    #[arg(long)]
    json_report: Option<PathBuf>,

    /// Save the trained weights as JSON
    #[arg(long)]
    save_weights: Option<PathBuf>,

    /// Append every final weight to the text log
    #[arg(long)]
    dump_weights: bool,

    /// Seed for random weight initialisation, overriding the config
    #[arg(long)]
    seed: Option<u64>,

    /// Log each sweep's maximum error (at debug level)
    #[arg(long)]
    sweeps: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let options = RunOptions {
        log_path: cli.log.unwrap_or_else(|| runner::default_log_path(&cli.config)),
        json_report: cli.json_report,
        save_weights: cli.save_weights,
        dump_weights: cli.dump_weights,
        seed: cli.seed,
    };

    let mut sink = LogSink { sweeps: cli.sweeps };
    let report = runner::run_file(&cli.config, &options, &mut sink)
        .with_context(|| format!("training run from {} failed", cli.config.display()))?;

    info!(
        "done: {} after {} iterations, max error {:e}",
        report.reason,
        report.iterations,
        report.max_error()
    );
    Ok(())
}
