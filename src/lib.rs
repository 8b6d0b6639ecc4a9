pub mod math;
pub mod activation;
pub mod network;
pub mod data;
pub mod train;
pub mod config;
pub mod error;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::{sigmoid, SigmoidDerivative};
pub use network::network::{Network, Prediction};
pub use network::config::NetworkConfig;
pub use network::rule::{BackpropRule, HiddenErrorSignal};
pub use data::mnist::{Sample, SampleReader};
pub use train::trainer::{evaluate, train_epochs};
pub use train::train_config::TrainConfig;
pub use config::Config;
pub use error::{NetworkError, Result};
