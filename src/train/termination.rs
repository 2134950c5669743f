use serde::{Serialize, Deserialize};
use std::fmt;

use crate::train::train_config::Hyperparameters;

/// Why a training run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// The iteration budget ran out.
    Timeout,
    /// The worst example error fell below the threshold.
    ErrorThreshold,
    /// The learning rate is zero, so the weights can never move.
    ZeroLearningRate,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationReason::Timeout => write!(f, "Timeout"),
            TerminationReason::ErrorThreshold => write!(f, "Error Threshold"),
            TerminationReason::ZeroLearningRate => write!(f, "Learning Rate = 0"),
        }
    }
}

/// Training loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingStatus {
    Running,
    Terminated(TerminationReason),
}

impl TrainingStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, TrainingStatus::Running)
    }
}

/// Checked once before the first sweep. Only a zero learning rate can end
/// the run here: validated hyperparameters never have a zero iteration budget.
pub fn check_before_training(hp: &Hyperparameters) -> TrainingStatus {
    if hp.learning_rate == 0.0 {
        TrainingStatus::Terminated(TerminationReason::ZeroLearningRate)
    } else {
        TrainingStatus::Running
    }
}

/// Checked at the end of every sweep, in priority order: timeout, error
/// threshold, zero learning rate.
pub fn check_after_sweep(hp: &Hyperparameters, iteration: usize, max_error: f64) -> TrainingStatus {
    if iteration >= hp.max_iterations {
        TrainingStatus::Terminated(TerminationReason::Timeout)
    } else if max_error < hp.error_threshold {
        TrainingStatus::Terminated(TerminationReason::ErrorThreshold)
    } else if hp.learning_rate == 0.0 {
        TrainingStatus::Terminated(TerminationReason::ZeroLearningRate)
    } else {
        TrainingStatus::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_wins_over_threshold() {
        let hp = Hyperparameters::new(0.5, 10, 0.1);
        assert_eq!(
            check_after_sweep(&hp, 10, 0.0),
            TrainingStatus::Terminated(TerminationReason::Timeout)
        );
    }

    #[test]
    fn threshold_is_strict() {
        let hp = Hyperparameters::new(0.5, 10, 0.1);
        assert_eq!(check_after_sweep(&hp, 4, 0.1), TrainingStatus::Running);
        assert_eq!(
            check_after_sweep(&hp, 4, 0.0999),
            TrainingStatus::Terminated(TerminationReason::ErrorThreshold)
        );
    }

    #[test]
    fn zero_learning_rate_stops_before_training() {
        let hp = Hyperparameters::new(0.0, 10, 0.1);
        assert_eq!(
            check_before_training(&hp),
            TrainingStatus::Terminated(TerminationReason::ZeroLearningRate)
        );
        assert_eq!(
            check_after_sweep(&hp, 2, 1.0),
            TrainingStatus::Terminated(TerminationReason::ZeroLearningRate)
        );
        assert!(check_before_training(&Hyperparameters::new(0.1, 10, 0.1)).is_running());
    }
}
