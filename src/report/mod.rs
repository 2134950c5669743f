pub mod training_report;

pub use training_report::{CaseReport, TrainingReport};
