use std::path::Path;

use rand::Rng;

use crate::activation::sigmoid;
use crate::error::{NetworkError, Result};
use crate::math::matrix::Matrix;
use crate::math::ops::{add, apply_function, dot, multiply, scale, subtract};
use crate::network::config::NetworkConfig;
use crate::network::persist::{read_matrix, weight_paths, write_matrix};
use crate::network::rule::{BackpropRule, HiddenErrorSignal};

/// Result of a forward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Output activations, `output_size × 1`.
    pub output: Matrix,
    /// Hidden activations, `hidden_size × 1`. Kept so `train` does not recompute them.
    pub hidden: Matrix,
}

impl Prediction {
    /// Index of the strongest output unit (ties resolve to the lowest index).
    pub fn best_class(&self) -> usize {
        let mut best = 0;
        let mut highest = f64::NEG_INFINITY;
        for (i, &v) in self.output.as_slice().iter().enumerate() {
            if v > highest {
                best = i;
                highest = v;
            }
        }
        best
    }
}

/// Feed-forward network with one sigmoid hidden layer and a sigmoid output layer.
#[derive(Debug, Clone)]
pub struct Network {
    input_size: usize,
    hidden_size: usize,
    output_size: usize,
    learning_rate: f64,
    rule: BackpropRule,
    /// `hidden_size × input_size`
    hidden_weights: Matrix,
    /// `output_size × hidden_size`
    output_weights: Matrix,
}

impl Network {
    /// Builds a network with weights drawn from the thread-local RNG.
    pub fn new(input_size: usize, hidden_size: usize, output_size: usize, learning_rate: f64) -> Result<Network> {
        Network::with_rng(input_size, hidden_size, output_size, learning_rate, &mut rand::thread_rng())
    }

    /// Builds a network drawing its initial weights from `rng`.
    ///
    /// Each weight is sampled from `Uniform[-1/sqrt(fan_in), 1/sqrt(fan_in)]`,
    /// with `fan_in = input_size` for the hidden layer and `hidden_size` for
    /// the output layer.
    pub fn with_rng<R: Rng + ?Sized>(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        learning_rate: f64,
        rng: &mut R,
    ) -> Result<Network> {
        let config = NetworkConfig::new(input_size, hidden_size, output_size, learning_rate);
        Network::from_config_with_rng(&config, rng)
    }

    pub fn from_config(config: &NetworkConfig) -> Result<Network> {
        Network::from_config_with_rng(config, &mut rand::thread_rng())
    }

    pub fn from_config_with_rng<R: Rng + ?Sized>(config: &NetworkConfig, rng: &mut R) -> Result<Network> {
        config.validate()?;
        let hidden_weights = Matrix::fan_in_uniform(config.hidden_size, config.input_size, rng);
        let output_weights = Matrix::fan_in_uniform(config.output_size, config.hidden_size, rng);
        Ok(Network {
            input_size: config.input_size,
            hidden_size: config.hidden_size,
            output_size: config.output_size,
            learning_rate: config.learning_rate,
            rule: config.rule,
            hidden_weights,
            output_weights,
        })
    }

    pub fn with_rule(mut self, rule: BackpropRule) -> Network {
        self.rule = rule;
        self
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn rule(&self) -> BackpropRule {
        self.rule
    }

    pub fn hidden_weights(&self) -> &Matrix {
        &self.hidden_weights
    }

    pub fn output_weights(&self) -> &Matrix {
        &self.output_weights
    }

    /// Forward pass over a single input vector of length `input_size`.
    pub fn predict(&self, input: &[f64]) -> Result<Prediction> {
        self.forward(&Matrix::column(input))
    }

    fn forward(&self, inputs: &Matrix) -> Result<Prediction> {
        let hidden_inputs = dot(&self.hidden_weights, inputs)?;
        let hidden = apply_function(sigmoid, &hidden_inputs);

        let final_inputs = dot(&self.output_weights, &hidden)?;
        let output = apply_function(sigmoid, &final_inputs);

        Ok(Prediction { output, hidden })
    }

    /// One online backpropagation step on a single `(input, target)` pair.
    ///
    /// All gradients and the updated matrices are computed before either weight
    /// field is replaced, so on error the network is left exactly as it was.
    pub fn train(&mut self, input: &[f64], target: &[f64]) -> Result<()> {
        self.train_step(input, target).map(|_| ())
    }

    /// Same as [`Network::train`], returning the prediction made before the update.
    pub fn train_step(&mut self, input: &[f64], target: &[f64]) -> Result<Prediction> {
        let inputs = Matrix::column(input);
        let targets = Matrix::column(target);
        let derivative = self.rule.derivative;
        let slope = move |a: f64| derivative.slope(a);

        let prediction = self.forward(&inputs)?;
        let Prediction { output, hidden } = &prediction;

        let output_error = subtract(&targets, output)?;
        let output_delta = multiply(&output_error, &apply_function(slope, output))?;
        let output_change = dot(&output_delta, &hidden.transpose())?;

        let signal = match self.rule.hidden_error {
            HiddenErrorSignal::RawError => &output_error,
            HiddenErrorSignal::OutputDelta => &output_delta,
        };
        let hidden_error = dot(&self.output_weights.transpose(), signal)?;
        let hidden_delta = multiply(&hidden_error, &apply_function(slope, hidden))?;
        let hidden_change = dot(&hidden_delta, &inputs.transpose())?;

        let output_weights = add(&self.output_weights, &scale(self.learning_rate, &output_change))?;
        let hidden_weights = add(&self.hidden_weights, &scale(self.learning_rate, &hidden_change))?;

        self.output_weights = output_weights;
        self.hidden_weights = hidden_weights;
        Ok(prediction)
    }

    /// Writes both weight matrices next to `path` (see [`weight_paths`]).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let (hidden_path, output_path) = weight_paths(path.as_ref())?;
        write_matrix(&hidden_path, &self.hidden_weights)?;
        write_matrix(&output_path, &self.output_weights)?;
        log::info!(
            "saved {}-{}-{} network to {} and {}",
            self.input_size,
            self.hidden_size,
            self.output_size,
            hidden_path.display(),
            output_path.display()
        );
        Ok(())
    }

    /// Replaces both weight matrices with the ones stored next to `path`.
    ///
    /// Both files are read and checked against this network's layer sizes before
    /// anything is replaced; any failure leaves the current weights in place.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let (hidden_path, output_path) = weight_paths(path.as_ref())?;
        let hidden_weights = read_matrix(&hidden_path)?;
        let output_weights = read_matrix(&output_path)?;

        let expected_hidden = (self.hidden_size, self.input_size);
        if hidden_weights.shape() != expected_hidden {
            return Err(NetworkError::mismatch("load hidden weights", expected_hidden, hidden_weights.shape()));
        }
        let expected_output = (self.output_size, self.hidden_size);
        if output_weights.shape() != expected_output {
            return Err(NetworkError::mismatch("load output weights", expected_output, output_weights.shape()));
        }

        self.hidden_weights = hidden_weights;
        self.output_weights = output_weights;
        log::info!("loaded weights from {} and {}", hidden_path.display(), output_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded(input: usize, hidden: usize, output: usize) -> Network {
        let mut rng = StdRng::seed_from_u64(42);
        Network::with_rng(input, hidden, output, 0.1, &mut rng).unwrap()
    }

    fn squared_error(output: &Matrix, target: &[f64]) -> f64 {
        output.as_slice().iter().zip(target).map(|(o, t)| (t - o).powi(2)).sum()
    }

    #[test]
    fn weights_have_layer_shapes() {
        let n = seeded(3, 4, 2);
        assert_eq!(n.hidden_weights().shape(), (4, 3));
        assert_eq!(n.output_weights().shape(), (2, 4));
    }

    #[test]
    fn initial_weights_respect_fan_in_bound() {
        let n = seeded(9, 16, 3);
        let hidden_bound = 1.0 / 3.0;
        let output_bound = 0.25;
        assert!(n.hidden_weights().as_slice().iter().all(|w| w.abs() <= hidden_bound));
        assert!(n.output_weights().as_slice().iter().all(|w| w.abs() <= output_bound));
    }

    #[test]
    fn invalid_sizes_are_rejected() {
        assert!(matches!(Network::new(0, 4, 2, 0.1), Err(NetworkError::InvalidConfig(_))));
        assert!(matches!(Network::new(3, 4, 2, -1.0), Err(NetworkError::InvalidConfig(_))));
    }

    #[test]
    fn predict_returns_output_and_hidden_activations() {
        let n = seeded(3, 4, 2);
        let p = n.predict(&[0.5, 0.2, 0.9]).unwrap();
        assert_eq!(p.output.shape(), (2, 1));
        assert_eq!(p.hidden.shape(), (4, 1));
        assert!(p.output.as_slice().iter().all(|&v| v > 0.0 && v < 1.0));
        assert!(p.hidden.as_slice().iter().all(|&v| v > 0.0 && v < 1.0));
    }

    #[test]
    fn predict_rejects_wrong_input_length() {
        let n = seeded(3, 4, 2);
        assert!(matches!(
            n.predict(&[0.5, 0.2]),
            Err(NetworkError::DimensionMismatch { op: "dot", .. })
        ));
    }

    #[test]
    fn hidden_activations_match_manual_forward_pass() {
        let n = seeded(2, 2, 1);
        let x = [0.3, 0.7];
        let p = n.predict(&x).unwrap();
        let w = n.hidden_weights();
        for j in 0..2 {
            let z = w.get(j, 0) * x[0] + w.get(j, 1) * x[1];
            assert!((p.hidden.get(j, 0) - sigmoid(z)).abs() < 1e-12);
        }
    }

    #[test]
    fn failed_train_leaves_weights_untouched() {
        let mut n = seeded(3, 4, 2);
        let before = n.clone();

        assert!(n.train(&[0.5, 0.2, 0.9], &[0.99, 0.01, 0.01]).is_err());
        assert!(n.train(&[0.5, 0.2], &[0.99, 0.01]).is_err());

        assert_eq!(n.hidden_weights(), before.hidden_weights());
        assert_eq!(n.output_weights(), before.output_weights());
    }

    #[test]
    fn training_moves_weights() {
        let mut n = seeded(3, 4, 2);
        let before = n.clone();
        n.train(&[0.5, 0.2, 0.9], &[0.99, 0.01]).unwrap();
        assert_ne!(n.hidden_weights(), before.hidden_weights());
        assert_ne!(n.output_weights(), before.output_weights());
    }

    #[test]
    fn output_update_matches_hand_computed_step() {
        let mut n = seeded(2, 2, 1);
        let x = [0.4, 0.8];
        let t = [0.99];
        let p = n.predict(&x).unwrap();
        let o = p.output.get(0, 0);
        let s = sigmoid(o);
        let delta = (t[0] - o) * s * (1.0 - s);
        let expected: Vec<f64> = (0..2)
            .map(|j| n.output_weights().get(0, j) + 0.1 * delta * p.hidden.get(j, 0))
            .collect();

        n.train(&x, &t).unwrap();
        for j in 0..2 {
            assert!((n.output_weights().get(0, j) - expected[j]).abs() < 1e-12);
        }
    }

    #[test]
    fn repeated_training_reduces_error_monotonically() {
        let mut n = seeded(3, 4, 2);
        let x = [0.5, 0.2, 0.9];
        let t = [0.99, 0.01];

        let mut previous = squared_error(&n.predict(&x).unwrap().output, &t);
        for _ in 0..100 {
            n.train(&x, &t).unwrap();
            let current = squared_error(&n.predict(&x).unwrap().output, &t);
            assert!(current < previous, "error went from {previous} to {current}");
            previous = current;
        }
    }

    #[test]
    fn textbook_rule_also_converges() {
        let mut n = seeded(3, 4, 2).with_rule(BackpropRule::textbook());
        let x = [0.5, 0.2, 0.9];
        let t = [0.99, 0.01];
        let start = squared_error(&n.predict(&x).unwrap().output, &t);
        for _ in 0..100 {
            n.train(&x, &t).unwrap();
        }
        let end = squared_error(&n.predict(&x).unwrap().output, &t);
        assert!(end < start);
    }

    #[test]
    fn best_class_picks_largest_output() {
        let p = Prediction {
            output: Matrix::column(&[0.1, 0.7, 0.3]),
            hidden: Matrix::column(&[0.5]),
        };
        assert_eq!(p.best_class(), 1);
    }
}
