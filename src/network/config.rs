use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, Result};
use crate::network::rule::BackpropRule;

/// Layer sizes and learning parameters of a [`Network`](crate::Network).
///
/// Defaults describe the MNIST setup: 784 inputs (28×28 pixels), 200 hidden
/// neurons, 10 outputs (digits 0–9) and a learning rate of 0.1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub input_size: usize,
    pub hidden_size: usize,
    pub output_size: usize,
    pub learning_rate: f64,
    pub rule: BackpropRule,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            input_size: 784,
            hidden_size: 200,
            output_size: 10,
            learning_rate: 0.1,
            rule: BackpropRule::default(),
        }
    }
}

impl NetworkConfig {
    pub fn new(input_size: usize, hidden_size: usize, output_size: usize, learning_rate: f64) -> Self {
        NetworkConfig {
            input_size,
            hidden_size,
            output_size,
            learning_rate,
            rule: BackpropRule::default(),
        }
    }

    /// Rejects layer sizes of zero and learning rates that are not finite and positive.
    pub fn validate(&self) -> Result<()> {
        for (name, size) in [
            ("input_size", self.input_size),
            ("hidden_size", self.hidden_size),
            ("output_size", self.output_size),
        ] {
            if size == 0 {
                return Err(NetworkError::InvalidConfig(format!("{name} must be at least 1")));
            }
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(NetworkError::InvalidConfig(format!(
                "learning_rate must be finite and positive, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}
