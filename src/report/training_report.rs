use serde::{Serialize, Deserialize};
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::network::weights::WeightTensor;
use crate::train::termination::TerminationReason;

/// Final result for one example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseReport {
    pub case: usize,
    pub target: Vec<f64>,
    pub computed: Vec<f64>,
    pub error: f64,
}

/// Summary of a finished training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub reason: TerminationReason,
    /// Single-example steps taken.
    pub iterations: usize,
    pub sweeps: usize,
    pub elapsed_ms: u64,
    pub cases: Vec<CaseReport>,
}

impl TrainingReport {
    /// Largest per-case error in the report.
    pub fn max_error(&self) -> f64 {
        self.cases.iter().map(|c| c.error).fold(0.0, f64::max)
    }

    /// Writes the plain-text run log: cause of termination, iteration count,
    /// one block of target/calculated pairs per case and, when given, every
    /// final weight.
    pub fn write_log<W: Write>(
        &self,
        out: &mut W,
        error_threshold: f64,
        weights: Option<&WeightTensor>,
    ) -> Result<()> {
        match self.reason {
            TerminationReason::ErrorThreshold => writeln!(
                out,
                "Cause of Termination: Error Threshold ({error_threshold}) reached for all cases\n"
            )?,
            reason => writeln!(out, "Cause of Termination: {reason}\n")?,
        }
        writeln!(out, "Iterations: {}\n", self.iterations)?;

        for case in &self.cases {
            writeln!(out, "Case {}: Target / Calculated", case.case)?;
            for (target, computed) in case.target.iter().zip(case.computed.iter()) {
                writeln!(out, "{target} {computed}")?;
            }
            writeln!(out, "Case {} total error: {}\n", case.case, case.error)?;
        }

        if let Some(weights) = weights {
            write!(out, "Final Weights:\n{}", weights.listing())?;
        }
        Ok(())
    }

    /// Writes the log to `path`, replacing any existing file.
    pub fn save_log(&self, path: impl AsRef<Path>, error_threshold: f64, weights: Option<&WeightTensor>) -> Result<()> {
        let file = std::fs::File::create(path.as_ref())?;
        let mut writer = std::io::BufWriter::new(file);
        self.write_log(&mut writer, error_threshold, weights)?;
        writer.flush()?;
        Ok(())
    }

    /// Serializes the report to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path.as_ref())?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}
