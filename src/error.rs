use std::path::PathBuf;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, NetworkError>;

/// Shape of a matrix as `(rows, cols)`.
pub type Shape = (usize, usize);

#[derive(Error, Debug)]
pub enum NetworkError {
    /// Two operands of a matrix operation have incompatible shapes.
    #[error("dimension mismatch in {op}: {left:?} vs {right:?}")]
    DimensionMismatch {
        op: &'static str,
        left: Shape,
        right: Shape,
    },

    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    /// The weight file exists but its bytes are not a valid encoded matrix.
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },

    /// The weight file decoded, but its contents are structurally invalid.
    #[error("corrupt weight file {path}: {reason}")]
    CorruptWeights { path: PathBuf, reason: String },

    #[error("failed to encode weights: {0}")]
    Encode(#[source] bincode::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A dataset row could not be turned into a sample.
    #[error("invalid sample at line {line}: {reason}")]
    InvalidSample { line: u64, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid model path: {0}")]
    InvalidPath(PathBuf),
}

impl NetworkError {
    pub(crate) fn mismatch(op: &'static str, left: Shape, right: Shape) -> Self {
        NetworkError::DimensionMismatch { op, left, right }
    }

    /// True for errors a training loop may skip without aborting the run.
    pub fn is_sample_error(&self) -> bool {
        matches!(self, NetworkError::InvalidSample { .. })
    }
}
