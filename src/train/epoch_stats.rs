use serde::{Deserialize, Serialize};

/// Per-epoch training statistics returned by `train_epochs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    pub total_epochs: usize,
    /// Samples the network was trained on.
    pub samples: usize,
    /// Malformed rows skipped during this epoch.
    pub skipped: usize,
    /// Mean squared error of each sample's prediction, measured before its update.
    pub mean_loss: f64,
    pub elapsed_ms: u64,
}

/// Outcome of scoring a network against a labelled CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalReport {
    /// Samples whose strongest output matched the label.
    pub score: usize,
    pub total: usize,
    pub skipped: usize,
    /// `score / total`, or 0 when nothing was scored.
    pub accuracy: f64,
    pub elapsed_ms: u64,
}
