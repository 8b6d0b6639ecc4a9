use serde::{Deserialize, Serialize};
use std::f64::consts::E;

/// Logistic function `1 / (1 + e^-x)`.
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + E.powf(-x))
}

/// How the sigmoid slope is obtained from a layer's stored activations.
///
/// The network only keeps post-activation values, so the slope has to be
/// recovered from `a = sigmoid(z)` rather than from `z` itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SigmoidDerivative {
    /// `sigmoid(a) * (1 - sigmoid(a))`: sigmoid is applied a second time to the
    /// activation. This is the slope the reference MNIST network trains with.
    #[default]
    Reapplied,
    /// `a * (1 - a)`: the exact derivative at the pre-activation.
    FromActivation,
}

impl SigmoidDerivative {
    /// Slope for an already-activated value `a`.
    pub fn slope(&self, a: f64) -> f64 {
        match self {
            SigmoidDerivative::Reapplied => {
                let s = sigmoid(a);
                s * (1.0 - s)
            }
            SigmoidDerivative::FromActivation => a * (1.0 - a),
        }
    }
}
