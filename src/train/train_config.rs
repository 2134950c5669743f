use serde::{Serialize, Deserialize};

use crate::error::{NetError, Result};

/// Hyperparameters for a training run. Fixed for the whole run.
///
/// # Fields
/// - `learning_rate`:   gradient-descent step size; `0.0` is allowed and ends
///                       the run before any sweep
/// - `max_iterations`:  single-example steps after which the run times out
/// - `report_interval`: a progress record is emitted every this many steps
/// - `error_threshold`: training stops once the worst example error is below this
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    pub learning_rate: f64,
    pub max_iterations: usize,
    pub report_interval: usize,
    pub error_threshold: f64,
}

impl Hyperparameters {
    pub fn new(learning_rate: f64, max_iterations: usize, error_threshold: f64) -> Self {
        Hyperparameters {
            learning_rate,
            max_iterations,
            report_interval: max_iterations.max(1),
            error_threshold,
        }
    }

    pub fn with_report_interval(mut self, report_interval: usize) -> Self {
        self.report_interval = report_interval;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate < 0.0 {
            return Err(NetError::InvalidHyperparameter {
                name: "learning_rate",
                reason: format!("must be a finite value >= 0, got {}", self.learning_rate),
            });
        }
        if !self.error_threshold.is_finite() || self.error_threshold < 0.0 {
            return Err(NetError::InvalidHyperparameter {
                name: "error_threshold",
                reason: format!("must be a finite value >= 0, got {}", self.error_threshold),
            });
        }
        if self.max_iterations == 0 {
            return Err(NetError::InvalidHyperparameter {
                name: "max_iterations",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.report_interval == 0 {
            return Err(NetError::InvalidHyperparameter {
                name: "report_interval",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
