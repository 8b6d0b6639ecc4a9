use serde::{Deserialize, Serialize};

use crate::activation::SigmoidDerivative;

/// Which error signal is pushed back through the output weights to the hidden layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HiddenErrorSignal {
    /// `Woᵀ · (target - output)`, before the output slope is applied.
    #[default]
    RawError,
    /// `Woᵀ · output_delta`, the textbook backpropagated delta.
    OutputDelta,
}

/// Knobs controlling the backward pass.
///
/// The default is the classic MNIST training setup:
/// reapplied sigmoid slope and the raw output error sent to the hidden layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackpropRule {
    pub derivative: SigmoidDerivative,
    pub hidden_error: HiddenErrorSignal,
}

impl BackpropRule {
    /// Standard backpropagation for squared error with sigmoid units.
    pub fn textbook() -> Self {
        BackpropRule {
            derivative: SigmoidDerivative::FromActivation,
            hidden_error: HiddenErrorSignal::OutputDelta,
        }
    }
}
