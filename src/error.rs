use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NetError>;

/// Everything that can stop a run before or during training.
///
/// Configuration problems are raised before the first sweep; once training
/// has started the only failure left is a caller breaking the
/// forward-before-backward ordering, reported as `StaleActivations`.
#[derive(Error, Debug)]
pub enum NetError {
    #[error("invalid layer layout: {0}")]
    InvalidLayout(String),

    #[error("shape mismatch in {what}: expected {expected}, found {found}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid hyperparameter `{name}`: {reason}")]
    InvalidHyperparameter { name: &'static str, reason: String },

    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("activations are stale: run forward propagation on the current inputs and weights before {0}")]
    StaleActivations(&'static str),

    #[error("case {case} is out of range for a training set of {len} examples")]
    CaseOutOfRange { case: usize, len: usize },

    #[error("non-square image: {0}")]
    NonSquareImage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl NetError {
    pub(crate) fn shape(what: impl Into<String>, expected: usize, found: usize) -> NetError {
        NetError::ShapeMismatch {
            what: what.into(),
            expected,
            found,
        }
    }
}
