//! MNIST CSV reader.
//!
//! Expected format: no header, one sample per row, `label, pixel_0, ..., pixel_n`
//! with integer labels and raw pixel intensities in `[0, 255]`.
//!
//! Rows are streamed; a full training file is never held in memory.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};

use crate::error::{NetworkError, Result};

/// Target value for every class except the true one.
pub const TARGET_OFF: f64 = 0.01;
/// Target value for the true class.
pub const TARGET_ON: f64 = 0.99;

/// One labelled, normalized example.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub label: usize,
    pub input: Vec<f64>,
    pub target: Vec<f64>,
}

/// Maps a raw `[0, 255]` intensity to `[0.01, 1.0]`, keeping inputs away from zero.
pub fn normalize_pixel(value: f64) -> f64 {
    (value / 255.0 * 0.99) + 0.01
}

/// `classes`-long target with [`TARGET_ON`] at `label` and [`TARGET_OFF`] elsewhere.
pub fn one_hot(label: usize, classes: usize) -> Vec<f64> {
    let mut target = vec![TARGET_OFF; classes];
    if let Some(slot) = target.get_mut(label) {
        *slot = TARGET_ON;
    }
    target
}

pub struct SampleReader<R: Read> {
    records: StringRecordsIntoIter<R>,
    input_size: usize,
    classes: usize,
}

impl SampleReader<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P, input_size: usize, classes: usize) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => NetworkError::FileNotFound(path.to_path_buf()),
            _ => NetworkError::Io(e),
        })?;
        Ok(SampleReader::from_reader(BufReader::new(file), input_size, classes))
    }
}

impl<R: Read> SampleReader<R> {
    pub fn from_reader(reader: R, input_size: usize, classes: usize) -> Self {
        let records = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader)
            .into_records();
        SampleReader {
            records,
            input_size,
            classes,
        }
    }

    fn parse(&self, record: &StringRecord) -> Result<Sample> {
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let invalid = |reason: String| NetworkError::InvalidSample { line, reason };

        if record.len() != self.input_size + 1 {
            return Err(invalid(format!(
                "expected {} fields (label + {} pixels), got {}",
                self.input_size + 1,
                self.input_size,
                record.len()
            )));
        }

        let label_field = &record[0];
        let label: usize = label_field
            .parse()
            .map_err(|_| invalid(format!("label '{label_field}' is not a non-negative integer")))?;
        if label >= self.classes {
            return Err(invalid(format!("label {label} >= {} classes", self.classes)));
        }

        let input = record
            .iter()
            .skip(1)
            .enumerate()
            .map(|(i, field)| {
                field
                    .parse::<f64>()
                    .map(normalize_pixel)
                    .map_err(|_| invalid(format!("pixel {i} '{field}' is not a number")))
            })
            .collect::<Result<Vec<f64>>>()?;

        Ok(Sample {
            label,
            input,
            target: one_hot(label, self.classes),
        })
    }
}

impl<R: Read> Iterator for SampleReader<R> {
    type Item = Result<Sample>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(e.into())),
        };
        Some(self.parse(&record))
    }
}
