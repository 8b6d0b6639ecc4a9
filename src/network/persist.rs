//! Weight-file codec.
//!
//! Each file holds one matrix: `rows` and `cols` as little-endian `u64`, then
//! the row-major `f64` values (length-prefixed), encoded with bincode's
//! fixed-width integer options. Trailing bytes are rejected.

use std::fs::File;
use std::io::{BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use bincode::Options;
use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, Result};
use crate::math::matrix::Matrix;

/// File-name prefix of the input→hidden weights.
pub const HIDDEN_PREFIX: &str = "h";
/// File-name prefix of the hidden→output weights.
pub const OUTPUT_PREFIX: &str = "o";

#[derive(Serialize, Deserialize)]
struct WeightFile {
    rows: u64,
    cols: u64,
    data: Vec<f64>,
}

fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .reject_trailing_bytes()
}

/// Derives the `(hidden, output)` weight paths for a model path:
/// `dir/weights.model` becomes `dir/hweights.model` and `dir/oweights.model`.
pub fn weight_paths(path: &Path) -> Result<(PathBuf, PathBuf)> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| NetworkError::InvalidPath(path.to_path_buf()))?;
    let sibling = |prefix: &str| path.with_file_name(format!("{prefix}{name}"));
    Ok((sibling(HIDDEN_PREFIX), sibling(OUTPUT_PREFIX)))
}

pub fn encode_matrix(matrix: &Matrix) -> Result<Vec<u8>> {
    let file = WeightFile {
        rows: matrix.rows() as u64,
        cols: matrix.cols() as u64,
        data: matrix.as_slice().to_vec(),
    };
    codec().serialize(&file).map_err(NetworkError::Encode)
}

/// Decodes one matrix; `path` is only used for error reporting.
pub fn decode_matrix(bytes: &[u8], path: &Path) -> Result<Matrix> {
    let file: WeightFile = codec().deserialize(bytes).map_err(|source| NetworkError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let corrupt = |reason: String| NetworkError::CorruptWeights {
        path: path.to_path_buf(),
        reason,
    };
    let rows = usize::try_from(file.rows).map_err(|_| corrupt(format!("row count {} too large", file.rows)))?;
    let cols = usize::try_from(file.cols).map_err(|_| corrupt(format!("column count {} too large", file.cols)))?;
    let expected = rows
        .checked_mul(cols)
        .ok_or_else(|| corrupt(format!("{rows}x{cols} overflows")))?;
    if file.data.len() != expected {
        return Err(corrupt(format!(
            "header says {rows}x{cols} but {} values follow",
            file.data.len()
        )));
    }

    Matrix::from_vec(rows, cols, file.data)
}

pub fn write_matrix(path: &Path, matrix: &Matrix) -> Result<()> {
    let bytes = encode_matrix(matrix)?;
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&bytes)?;
    writer.flush()?;
    log::debug!("wrote {}x{} weights to {}", matrix.rows(), matrix.cols(), path.display());
    Ok(())
}

pub fn read_matrix(path: &Path) -> Result<Matrix> {
    let mut file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => NetworkError::FileNotFound(path.to_path_buf()),
        _ => NetworkError::Io(e),
    })?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    let matrix = decode_matrix(&bytes, path)?;
    log::debug!("read {}x{} weights from {}", matrix.rows(), matrix.cols(), path.display());
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_paths_prefix_the_file_name() {
        let (h, o) = weight_paths(Path::new("data/weights.model")).unwrap();
        assert_eq!(h, PathBuf::from("data/hweights.model"));
        assert_eq!(o, PathBuf::from("data/oweights.model"));

        let (h, o) = weight_paths(Path::new("net.bin")).unwrap();
        assert_eq!(h, PathBuf::from("hnet.bin"));
        assert_eq!(o, PathBuf::from("onet.bin"));
    }

    #[test]
    fn weight_paths_need_a_file_name() {
        assert!(matches!(
            weight_paths(Path::new("data/..")),
            Err(NetworkError::InvalidPath(_))
        ));
    }

    #[test]
    fn encoding_is_header_then_row_major_values() {
        let m = Matrix::from_vec(1, 2, vec![1.5, -2.0]).unwrap();
        let bytes = encode_matrix(&m).unwrap();
        // rows, cols, value count, two f64s
        assert_eq!(bytes.len(), 8 * 5);
        assert_eq!(&bytes[0..8], &1u64.to_le_bytes());
        assert_eq!(&bytes[8..16], &2u64.to_le_bytes());
        assert_eq!(&bytes[24..32], &1.5f64.to_le_bytes());
        assert_eq!(&bytes[32..40], &(-2.0f64).to_le_bytes());
    }

    #[test]
    fn decode_is_exact() {
        let m = Matrix::from_vec(2, 2, vec![0.1, f64::MIN_POSITIVE, -1e300, 1.0 / 3.0]).unwrap();
        let bytes = encode_matrix(&m).unwrap();
        assert_eq!(decode_matrix(&bytes, Path::new("x")).unwrap(), m);
    }

    #[test]
    fn truncated_and_padded_payloads_fail() {
        let m = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let bytes = encode_matrix(&m).unwrap();

        let truncated = &bytes[..bytes.len() - 3];
        assert!(matches!(
            decode_matrix(truncated, Path::new("x")),
            Err(NetworkError::Decode { .. })
        ));

        let mut padded = bytes.clone();
        padded.push(0);
        assert!(matches!(
            decode_matrix(&padded, Path::new("x")),
            Err(NetworkError::Decode { .. })
        ));
    }

    #[test]
    fn header_disagreeing_with_payload_is_corrupt() {
        let bogus = WeightFile {
            rows: 3,
            cols: 3,
            data: vec![0.0; 4],
        };
        let bytes = codec().serialize(&bogus).unwrap();
        assert!(matches!(
            decode_matrix(&bytes, Path::new("x")),
            Err(NetworkError::CorruptWeights { .. })
        ));
    }

    #[test]
    fn missing_file_is_reported_as_not_found() {
        let err = read_matrix(Path::new("/nonexistent/dir/hweights.model")).unwrap_err();
        assert!(matches!(err, NetworkError::FileNotFound(_)));
    }
}
