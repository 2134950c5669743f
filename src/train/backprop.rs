use crate::activation::activation::Activation;
use crate::error::{NetError, Result};
use crate::loss::half_sse::HalfSquaredError;
use crate::math::matrix::Matrix;
use crate::network::state::{Freshness, NetworkState};

/// Applies one gradient-descent update to every weight for a single example.
///
/// `state` must hold a forward pass over the example's input and the current
/// weights; otherwise `NetError::StaleActivations` is returned and nothing is
/// touched. Only the weight tensor is mutated. The activations and thetas are
/// left as they were, so the state is marked stale afterwards.
///
/// The hidden error signal `big_omega[layer][unit]` is accumulated from the
/// weights *before* their own update, which yields the exact gradient of
/// `0.5 * sum((t - a)²)` for any number of hidden layers.
pub fn back_propagate<A: Activation + ?Sized>(
    state: &mut NetworkState,
    activation: &A,
    target: &[f64],
    learning_rate: f64,
) -> Result<()> {
    state.require_fresh("back propagation")?;
    let width = state.layout().output_width();
    if target.len() != width {
        return Err(NetError::shape("target vector", width, target.len()));
    }
    let little_omega = HalfSquaredError::derivative(target, state.output_vector());

    let NetworkState { layout, activations, thetas, weights, freshness } = state;
    let last = layout.last();

    let mut big_omega = Matrix::zeros(layout.layer_count(), layout.max_width());

    // Output-adjacent slab: error comes straight from the targets.
    let j_layer = last - 1;
    {
        let slab = weights.slab_mut(j_layer);
        for j in 0..layout.width(j_layer) {
            let h_j = activations[(j_layer, j)];
            let mut big_omega_j = 0.0;

            for i in 0..layout.width(last) {
                let theta_i = thetas[(last, i)];
                let psi_i = little_omega[i] * activation.derivative(theta_i);

                big_omega_j += psi_i * slab[(j, i)];
                slab[(j, i)] += learning_rate * h_j * psi_i;
            }

            big_omega[(j_layer, j)] = big_omega_j;
        }
    }

    // Every earlier slab, walking back towards the inputs. A no-op when
    // there are no hidden layers.
    for layer in (0..last.saturating_sub(1)).rev() {
        let slab = weights.slab_mut(layer);
        for k in 0..layout.width(layer) {
            let a_k = activations[(layer, k)];
            let mut big_omega_k = 0.0;

            for j in 0..layout.width(layer + 1) {
                let big_psi_j = big_omega[(layer + 1, j)] * activation.derivative(thetas[(layer + 1, j)]);

                big_omega_k += big_psi_j * slab[(k, j)];
                slab[(k, j)] += learning_rate * a_k * big_psi_j;
            }

            big_omega[(layer, k)] = big_omega_k;
        }
    }

    *freshness = Freshness::Stale;
    Ok(())
}
