use std::path::Path;
use std::time::Instant;

use crate::data::mnist::{Sample, SampleReader};
use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::train::epoch_stats::{EpochStats, EvalReport};
use crate::train::train_config::TrainConfig;

/// Mean of `(target - output)²` over the output units.
pub fn mean_squared_error(output: &Matrix, target: &[f64]) -> f64 {
    let n = target.len().max(1) as f64;
    output
        .as_slice()
        .iter()
        .zip(target)
        .map(|(o, t)| (t - o).powi(2))
        .sum::<f64>()
        / n
}

/// Sample counts and summed loss from one pass.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PassTotals {
    pub samples: usize,
    pub skipped: usize,
    pub loss_sum: f64,
}

/// Trains on every sample yielded by `samples`, in order, one update per sample.
///
/// Malformed rows are logged and skipped; any other error aborts the pass.
pub fn train_samples<I>(network: &mut Network, samples: I) -> Result<PassTotals>
where
    I: IntoIterator<Item = Result<Sample>>,
{
    let mut totals = PassTotals::default();
    for sample in samples {
        let sample = match sample {
            Ok(sample) => sample,
            Err(e) if e.is_sample_error() => {
                log::warn!("skipping {e}");
                totals.skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };
        let before = network.train_step(&sample.input, &sample.target)?;
        totals.loss_sum += mean_squared_error(&before.output, &sample.target);
        totals.samples += 1;
    }
    Ok(totals)
}

/// Runs `config.epochs` passes over `config.train_file`, re-reading the file each epoch.
pub fn train_epochs(network: &mut Network, config: &TrainConfig) -> Result<Vec<EpochStats>> {
    config.validate()?;
    let mut history = Vec::with_capacity(config.epochs);

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();
        let reader = SampleReader::open(&config.train_file, network.input_size(), network.output_size())?;
        let totals = train_samples(network, reader)?;

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            samples: totals.samples,
            skipped: totals.skipped,
            mean_loss: if totals.samples > 0 {
                totals.loss_sum / totals.samples as f64
            } else {
                0.0
            },
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        log::info!(
            "epoch {}/{}: {} samples, {} skipped, loss = {:.6} ({} ms)",
            stats.epoch,
            stats.total_epochs,
            stats.samples,
            stats.skipped,
            stats.mean_loss,
            stats.elapsed_ms
        );
        history.push(stats);
    }

    Ok(history)
}

/// Scores `network` on labelled samples: a hit is when the strongest output is the label.
pub fn evaluate_samples<I>(network: &Network, samples: I) -> Result<EvalReport>
where
    I: IntoIterator<Item = Result<Sample>>,
{
    let t_start = Instant::now();
    let mut score = 0;
    let mut total = 0;
    let mut skipped = 0;

    for sample in samples {
        let sample = match sample {
            Ok(sample) => sample,
            Err(e) if e.is_sample_error() => {
                log::warn!("skipping {e}");
                skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };
        if network.predict(&sample.input)?.best_class() == sample.label {
            score += 1;
        }
        total += 1;
    }

    Ok(EvalReport {
        score,
        total,
        skipped,
        accuracy: if total > 0 { score as f64 / total as f64 } else { 0.0 },
        elapsed_ms: t_start.elapsed().as_millis() as u64,
    })
}

pub fn evaluate<P: AsRef<Path>>(network: &Network, path: P) -> Result<EvalReport> {
    let reader = SampleReader::open(path, network.input_size(), network.output_size())?;
    let report = evaluate_samples(network, reader)?;
    log::info!(
        "scored {}/{} ({:.2}%), {} skipped",
        report.score,
        report.total,
        report.accuracy * 100.0,
        report.skipped
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn network() -> Network {
        let mut rng = StdRng::seed_from_u64(3);
        Network::with_rng(3, 6, 10, 0.3, &mut rng).unwrap()
    }

    fn rows(text: &str) -> SampleReader<&[u8]> {
        SampleReader::from_reader(text.as_bytes(), 3, 10)
    }

    #[test]
    fn mse_of_exact_output_is_zero() {
        let out = Matrix::column(&[0.2, 0.8]);
        assert_eq!(mean_squared_error(&out, &[0.2, 0.8]), 0.0);
        assert!((mean_squared_error(&out, &[0.0, 1.0]) - 0.04).abs() < 1e-12);
    }

    #[test]
    fn training_pass_counts_and_skips() {
        let mut n = network();
        let totals = train_samples(&mut n, rows("1,0,255,0\nbad,0,0,0\n2,255,0,0\n")).unwrap();
        assert_eq!(totals.samples, 2);
        assert_eq!(totals.skipped, 1);
        assert!(totals.loss_sum > 0.0);
    }

    #[test]
    fn non_sample_errors_abort_the_pass() {
        let mut n = network();
        let samples = vec![Err(NetworkError::InvalidConfig("boom".into()))];
        assert!(train_samples(&mut n, samples).is_err());
    }

    #[test]
    fn evaluation_learns_separable_rows() {
        let mut n = network();
        let data = "0,255,0,0\n1,0,255,0\n2,0,0,255\n";
        for _ in 0..2000 {
            train_samples(&mut n, rows(data)).unwrap();
        }
        let report = evaluate_samples(&n, rows(data)).unwrap();
        assert_eq!(report.total, 3);
        assert_eq!(report.score, 3);
        assert_eq!(report.accuracy, 1.0);
    }

    #[test]
    fn empty_evaluation_has_zero_accuracy() {
        let report = evaluate_samples(&network(), rows("")).unwrap();
        assert_eq!((report.score, report.total), (0, 0));
        assert_eq!(report.accuracy, 0.0);
    }

    #[test]
    fn zero_epochs_is_rejected() {
        let mut n = network();
        let config = TrainConfig {
            epochs: 0,
            ..TrainConfig::default()
        };
        assert!(matches!(train_epochs(&mut n, &config), Err(NetworkError::InvalidConfig(_))));
    }
}
