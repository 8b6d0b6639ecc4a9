use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;

use digit_nn::train::{evaluate, train_epochs};
use digit_nn::{Config, Network, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Train on the training CSV, then save the weights.
    Train,
    /// Load saved weights and score them on the test CSV.
    Predict,
}

/// One-hidden-layer MNIST digit classifier.
#[derive(Debug, Parser)]
#[command(name = "digit-nn", version, about)]
struct Cli {
    /// Train a fresh network, or load saved weights and score them
    #[arg(long, value_enum)]
    mnist: Option<Mode>,

    /// JSON run configuration; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    train_file: Option<PathBuf>,

    #[arg(long)]
    test_file: Option<PathBuf>,

    /// Base path of the weight files (`h<name>` and `o<name>` are written beside it)
    #[arg(long)]
    model: Option<PathBuf>,

    #[arg(long)]
    epochs: Option<usize>,

    #[arg(long)]
    learning_rate: Option<f64>,

    /// Hidden neurons
    #[arg(long)]
    hidden: Option<usize>,

    /// Seed for weight initialization
    #[arg(long)]
    seed: Option<u64>,

    /// Write epoch statistics or the evaluation report here as JSON
    #[arg(long)]
    report: Option<PathBuf>,
}

impl Cli {
    fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_json(path)?,
            None => Config::default(),
        };
        if let Some(path) = &self.train_file {
            config.training.train_file = path.clone();
        }
        if let Some(path) = &self.test_file {
            config.training.test_file = path.clone();
        }
        if let Some(path) = &self.model {
            config.training.model_path = path.clone();
        }
        if let Some(epochs) = self.epochs {
            config.training.epochs = epochs;
        }
        if let Some(rate) = self.learning_rate {
            config.network.learning_rate = rate;
        }
        if let Some(hidden) = self.hidden {
            config.network.hidden_size = hidden;
        }
        if self.seed.is_some() {
            config.training.seed = self.seed;
        }
        config.validate()?;
        Ok(config)
    }
}

fn build_network(config: &Config) -> Result<Network> {
    match config.training.seed {
        Some(seed) => Network::from_config_with_rng(&config.network, &mut StdRng::seed_from_u64(seed)),
        None => Network::from_config(&config.network),
    }
}

fn write_report<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), value)?;
    log::info!("report written to {}", path.display());
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let Some(mode) = cli.mnist else {
        println!("Nothing to do. Pass --mnist train or --mnist predict.");
        return Ok(());
    };

    let config = cli.resolve_config()?;
    let mut network = build_network(&config)?;

    match mode {
        Mode::Train => {
            let t1 = Instant::now();
            let history = train_epochs(&mut network, &config.training)?;
            println!("\nnetwork was training for {:?}", t1.elapsed());

            if let Some(dir) = config.training.model_path.parent().filter(|d| !d.as_os_str().is_empty()) {
                std::fs::create_dir_all(dir)?;
            }
            network.save(&config.training.model_path)?;
            if let Some(path) = &cli.report {
                write_report(path, &history)?;
            }
        }
        Mode::Predict => {
            network.load(&config.training.model_path)?;
            let report = evaluate(&network, &config.training.test_file)?;
            println!("Time taken to check: {} ms", report.elapsed_ms);
            println!("score: {} / {} ({:.2}%)", report.score, report.total, report.accuracy * 100.0);
            if let Some(path) = &cli.report {
                write_report(path, &report)?;
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
