use crate::error::{NetError, Result};
use crate::network::state::NetworkState;

/// Half the sum of squared differences between target and output.
pub struct HalfSquaredError;

impl HalfSquaredError {
    /// Scalar error: 0.5 * sum((target - output)²)
    pub fn loss(target: &[f64], output: &[f64]) -> f64 {
        0.5 * target.iter().zip(output.iter())
            .map(|(t, o)| (t - o) * (t - o))
            .sum::<f64>()
    }

    /// Per-output error signal: target - output
    pub fn derivative(target: &[f64], output: &[f64]) -> Vec<f64> {
        target.iter().zip(output.iter())
            .map(|(t, o)| t - o)
            .collect()
    }

    /// Error of the network's current output against `target`.
    ///
    /// The output layer must come from a forward pass over the current
    /// weights; the state is only read.
    pub fn of_state(state: &NetworkState, target: &[f64]) -> Result<f64> {
        state.require_fresh("computing the error")?;
        let width = state.layout().output_width();
        if target.len() != width {
            return Err(NetError::shape("target vector", width, target.len()));
        }
        Ok(Self::loss(target, state.output_vector()))
    }
}
