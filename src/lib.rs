pub mod error;
pub mod math;
pub mod activation;
pub mod network;
pub mod loss;
pub mod train;
pub mod report;
pub mod imaging;
pub mod config;
pub mod runner;

// Convenience re-exports
pub use error::{NetError, Result};
pub use math::matrix::Matrix;
pub use activation::activation::{Activation, Sigmoid};
pub use network::{LayerLayout, NetworkState, WeightTensor};
pub use loss::half_sse::HalfSquaredError;
pub use train::{
    Example, Hyperparameters, LogSink, ProgressRecord, ProgressSink, Recorder, SweepSummary,
    TerminationReason, TrainingEngine, TrainingSet, TrainingStatus,
};
pub use report::training_report::{CaseReport, TrainingReport};
pub use config::run_config::RunConfig;
pub use runner::RunOptions;
