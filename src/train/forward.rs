use crate::activation::activation::Activation;
use crate::network::state::{Freshness, NetworkState};

/// Propagates the inputs already loaded into layer 0 through every layer.
///
/// For each layer `l >= 1` and unit `right`:
///   theta[l][right]      = sum over left of activation[l-1][left] * weight[l-1][left][right]
///   activation[l][right] = f(theta[l][right])
///
/// Only the activation and theta tensors are written; afterwards the state
/// is fresh and may be back-propagated or scored.
pub fn forward<A: Activation + ?Sized>(state: &mut NetworkState, activation: &A) {
    let NetworkState { layout, activations, thetas, weights, freshness } = state;

    for layer in 1..layout.layer_count() {
        let slab = weights.slab(layer - 1);
        for right in 0..layout.width(layer) {
            let mut theta = 0.0;
            for left in 0..layout.width(layer - 1) {
                theta += activations[(layer - 1, left)] * slab[(left, right)];
            }
            thetas[(layer, right)] = theta;
            activations[(layer, right)] = activation.function(theta);
        }
    }

    *freshness = Freshness::Fresh;
}
