pub mod epoch_stats;
pub mod train_config;
pub mod trainer;

pub use epoch_stats::{EpochStats, EvalReport};
pub use train_config::TrainConfig;
pub use trainer::{evaluate, evaluate_samples, mean_squared_error, train_epochs, train_samples, PassTotals};
