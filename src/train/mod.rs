pub mod backprop;
pub mod engine;
pub mod examples;
pub mod forward;
pub mod progress;
pub mod termination;
pub mod train_config;

pub use backprop::back_propagate;
pub use engine::TrainingEngine;
pub use examples::{Example, TrainingSet};
pub use forward::forward;
pub use progress::{LogSink, ProgressRecord, ProgressSink, Recorder, SweepSummary};
pub use termination::{TerminationReason, TrainingStatus};
pub use train_config::Hyperparameters;
