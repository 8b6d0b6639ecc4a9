pub mod config;
pub mod network;
pub mod persist;
pub mod rule;

pub use config::NetworkConfig;
pub use network::{Network, Prediction};
pub use rule::{BackpropRule, HiddenErrorSignal};
