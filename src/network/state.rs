use crate::error::{NetError, Result};
use crate::math::matrix::Matrix;
use crate::network::layout::LayerLayout;
use crate::network::weights::WeightTensor;

/// Whether the activation and theta tensors describe the current inputs and
/// weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Inputs or weights changed since the last forward pass.
    Stale,
    /// Activations and thetas come from a forward pass over the current
    /// inputs and weights.
    Fresh,
}

/// All tensors describing the model.
///
/// `activations` and `thetas` are `[layer][unit]` grids padded to the widest
/// layer. Layer 0 of `activations` holds the raw inputs; layer 0 of `thetas`
/// is unused. Both are overwritten by every forward pass.
#[derive(Debug, Clone)]
pub struct NetworkState {
    pub(crate) layout: LayerLayout,
    pub(crate) activations: Matrix,
    pub(crate) thetas: Matrix,
    pub(crate) weights: WeightTensor,
    pub(crate) freshness: Freshness,
}

impl NetworkState {
    /// Allocates the activation and theta tensors for `weights`' layout.
    pub fn new(weights: WeightTensor) -> NetworkState {
        let layout = weights.layout().clone();
        let rows = layout.layer_count();
        let cols = layout.max_width();
        NetworkState {
            layout,
            activations: Matrix::zeros(rows, cols),
            thetas: Matrix::zeros(rows, cols),
            weights,
            freshness: Freshness::Stale,
        }
    }

    pub fn layout(&self) -> &LayerLayout {
        &self.layout
    }

    pub fn weights(&self) -> &WeightTensor {
        &self.weights
    }

    pub fn into_weights(self) -> WeightTensor {
        self.weights
    }

    pub fn activations(&self) -> &Matrix {
        &self.activations
    }

    pub fn thetas(&self) -> &Matrix {
        &self.thetas
    }

    pub fn freshness(&self) -> Freshness {
        self.freshness
    }

    pub fn is_fresh(&self) -> bool {
        self.freshness == Freshness::Fresh
    }

    /// Writes `inputs` into layer 0. Downstream layers become stale.
    pub fn load_inputs(&mut self, inputs: &[f64]) -> Result<()> {
        let width = self.layout.input_width();
        if inputs.len() != width {
            return Err(NetError::shape("input vector", width, inputs.len()));
        }
        self.activations.row_mut(0)[..width].copy_from_slice(inputs);
        self.freshness = Freshness::Stale;
        Ok(())
    }

    /// The logical slice of the output layer's activations.
    pub fn output_vector(&self) -> &[f64] {
        let last = self.layout.last();
        &self.activations.row(last)[..self.layout.width(last)]
    }

    /// Activations of one layer, without padding.
    pub fn layer_activations(&self, layer: usize) -> &[f64] {
        &self.activations.row(layer)[..self.layout.width(layer)]
    }

    /// Fails unless a forward pass has run since the last input or weight change.
    pub(crate) fn require_fresh(&self, operation: &'static str) -> Result<()> {
        match self.freshness {
            Freshness::Fresh => Ok(()),
            Freshness::Stale => Err(NetError::StaleActivations(operation)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> NetworkState {
        let layout = LayerLayout::new(vec![3, 4, 2]).unwrap();
        NetworkState::new(WeightTensor::zeros(&layout))
    }

    #[test]
    fn tensors_are_padded_to_the_widest_layer() {
        let s = state();
        assert_eq!((s.activations().rows, s.activations().cols), (3, 4));
        assert_eq!((s.thetas().rows, s.thetas().cols), (3, 4));
        assert_eq!(s.output_vector().len(), 2);
        assert!(!s.is_fresh());
    }

    #[test]
    fn load_inputs_rejects_wrong_length() {
        let mut s = state();
        assert!(matches!(
            s.load_inputs(&[1.0, 2.0]),
            Err(NetError::ShapeMismatch { expected: 3, found: 2, .. })
        ));
        s.load_inputs(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(s.layer_activations(0), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn stale_state_is_refused() {
        let s = state();
        assert!(matches!(
            s.require_fresh("back propagation"),
            Err(NetError::StaleActivations("back propagation"))
        ));
    }
}
