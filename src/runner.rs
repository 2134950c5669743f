use log::info;
use std::path::{Path, PathBuf};

use crate::config::run_config::{PreparedRun, RunConfig};
use crate::error::Result;
use crate::imaging::bitmap::{render_square, square_side};
use crate::report::training_report::TrainingReport;
use crate::train::engine::TrainingEngine;
use crate::train::progress::ProgressSink;

/// Where the results of a run are written.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Plain-text log; bitmap file names are derived from its stem.
    pub log_path: PathBuf,
    pub json_report: Option<PathBuf>,
    pub save_weights: Option<PathBuf>,
    /// Append every final weight to the text log.
    pub dump_weights: bool,
    /// Overrides the random-weight seed from the config.
    pub seed: Option<u64>,
}

impl RunOptions {
    pub fn new(log_path: impl Into<PathBuf>) -> RunOptions {
        RunOptions {
            log_path: log_path.into(),
            json_report: None,
            save_weights: None,
            dump_weights: false,
            seed: None,
        }
    }
}

/// `log<config file name>`, next to the config.
pub fn default_log_path(config_path: &Path) -> PathBuf {
    let name = config_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    config_path.with_file_name(format!("log{name}"))
}

/// `<log stem>_<iteration>_<max iterations>_case<case>.bmp`, next to the log.
pub fn bitmap_path(log_path: &Path, iteration: i64, max_iterations: usize, case: usize) -> PathBuf {
    let stem = log_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    log_path.with_file_name(format!("{stem}_{iteration}_{max_iterations}_case{case}.bmp"))
}

/// Loads the config at `config_path`, trains, and writes every requested output.
pub fn run_file<S: ProgressSink + ?Sized>(
    config_path: &Path,
    options: &RunOptions,
    sink: &mut S,
) -> Result<TrainingReport> {
    let mut config = RunConfig::load_json(config_path)?;
    if let Some(seed) = options.seed {
        config.set_seed(seed);
    }
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    run_prepared(config.prepare(base_dir)?, options, sink)
}

/// Trains an already prepared run and writes its outputs.
pub fn run_prepared<S: ProgressSink + ?Sized>(
    run: PreparedRun,
    options: &RunOptions,
    sink: &mut S,
) -> Result<TrainingReport> {
    let PreparedRun { state, examples, hyper, image } = run;
    let error_threshold = hyper.error_threshold;
    let max_iterations = hyper.max_iterations;
    let mut engine = TrainingEngine::new(state, examples, hyper)?;

    if let Some(settings) = image {
        // Fail before training if the outputs can never be drawn.
        square_side(engine.state().layout().output_width(), settings.square)?;
        engine.propagate(0)?;
        render_square(
            engine.state().output_vector(),
            settings.color,
            settings.square,
            &bitmap_path(&options.log_path, -1, max_iterations, 0),
        )?;
    }

    let report = engine.run(sink)?;

    if let Some(settings) = image {
        for case in &report.cases {
            let path = bitmap_path(&options.log_path, report.iterations as i64, max_iterations, case.case);
            render_square(&case.computed, settings.color, settings.square, &path)?;
        }
    }

    let weights = engine.state().weights();
    report.save_log(&options.log_path, error_threshold, options.dump_weights.then_some(weights))?;
    info!("wrote log to {}", options.log_path.display());

    if let Some(path) = &options.json_report {
        report.save_json(path)?;
        info!("wrote JSON report to {}", path.display());
    }
    if let Some(path) = &options.save_weights {
        weights.save_json(path)?;
        info!("saved weights to {}", path.display());
    }
    Ok(report)
}
