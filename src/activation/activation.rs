use serde::{Serialize, Deserialize};
use std::f64::consts::E;

/// The squashing function applied to every non-input unit.
///
/// `derivative` receives the *pre-activation* value (theta) captured during
/// the forward pass, not the activation itself.
pub trait Activation {
    fn function(&self, x: f64) -> f64;

    fn derivative(&self, x: f64) -> f64;
}

/// Logistic sigmoid, mapping the reals onto (0, 1).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sigmoid;

impl Activation for Sigmoid {
    fn function(&self, x: f64) -> f64 {
        1.0 / (1.0 + E.powf(-x))
    }

    /// Closed form through the activation value: f(x) * (1 - f(x)).
    fn derivative(&self, x: f64) -> f64 {
        let fx = self.function(x);
        fx * (1.0 - fx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn sigmoid_is_one_half_at_zero() {
        assert_abs_diff_eq!(Sigmoid.function(0.0), 0.5, epsilon = 1e-15);
    }

    #[test]
    fn sigmoid_stays_inside_the_unit_interval() {
        for x in [-30.0, -5.0, -0.1, 0.1, 5.0, 30.0] {
            let y = Sigmoid.function(x);
            assert!(y > 0.0 && y < 1.0, "sigmoid({x}) = {y}");
        }
    }

    #[test]
    fn derivative_matches_central_difference() {
        let h = 1e-5;
        let mut x = -10.0;
        while x <= 10.0 {
            let numeric = (Sigmoid.function(x + h) - Sigmoid.function(x - h)) / (2.0 * h);
            assert_abs_diff_eq!(Sigmoid.derivative(x), numeric, epsilon = 1e-6);
            x += 0.25;
        }
    }
}
