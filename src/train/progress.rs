use serde::{Serialize, Deserialize};
use std::sync::mpsc;

/// Diagnostic snapshot emitted by `TrainingEngine` every `report_interval`
/// single-example steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// 0-based index of the step being reported.
    pub iteration: usize,
    /// Wall-clock time since the engine was created, in milliseconds.
    pub elapsed_ms: u64,
    /// Error of `case` after its weight update.
    pub error: f64,
    /// Previous step's error minus this one; positive means improvement.
    pub error_change: f64,
    pub learning_rate: f64,
    /// Index of the example trained on in this step.
    pub case: usize,
    pub output: Vec<f64>,
    pub target: Vec<f64>,
}

/// Emitted after every full sweep over the training set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSummary {
    /// 1-based sweep number.
    pub sweep: usize,
    /// Total single-example steps so far.
    pub iteration: usize,
    /// Worst example error with the weights at the end of the sweep.
    pub max_error: f64,
}

/// Receives progress from a training run.
///
/// Sinks only observe; nothing they do can affect the tensors.
pub trait ProgressSink {
    fn record(&mut self, record: &ProgressRecord);

    fn sweep(&mut self, _summary: &SweepSummary) {}
}

/// Discards everything.
impl ProgressSink for () {
    fn record(&mut self, _record: &ProgressRecord) {}
}

/// Collects records in memory.
impl ProgressSink for Vec<ProgressRecord> {
    fn record(&mut self, record: &ProgressRecord) {
        self.push(record.clone());
    }
}

/// Streams records to another thread. Training has no cancellation point
/// mid-sweep, so a dropped receiver only loses the records.
impl ProgressSink for mpsc::Sender<ProgressRecord> {
    fn record(&mut self, record: &ProgressRecord) {
        if self.send(record.clone()).is_err() {
            log::debug!(
                "progress receiver is gone; dropped record for iteration {}",
                record.iteration
            );
        }
    }
}

/// Writes records through the `log` facade.
#[derive(Debug, Default)]
pub struct LogSink {
    /// Also log every sweep summary at debug level.
    pub sweeps: bool,
}

impl ProgressSink for LogSink {
    fn record(&mut self, r: &ProgressRecord) {
        log::info!(
            "iteration={} elapsed_min={:.4} error={:e} change={:e} learning_rate={} case={} output={:?} target={:?}",
            r.iteration,
            r.elapsed_ms as f64 / 60_000.0,
            r.error,
            r.error_change,
            r.learning_rate,
            r.case,
            r.output,
            r.target,
        );
    }

    fn sweep(&mut self, s: &SweepSummary) {
        if self.sweeps {
            log::debug!("sweep={} iteration={} max_error={:e}", s.sweep, s.iteration, s.max_error);
        }
    }
}

/// Keeps the sweep summaries as well as the step records.
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    pub records: Vec<ProgressRecord>,
    pub sweeps: Vec<SweepSummary>,
}

impl ProgressSink for Recorder {
    fn record(&mut self, record: &ProgressRecord) {
        self.records.push(record.clone());
    }

    fn sweep(&mut self, summary: &SweepSummary) {
        self.sweeps.push(summary.clone());
    }
}
