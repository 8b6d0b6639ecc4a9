use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, Result};
use crate::network::config::NetworkConfig;
use crate::train::train_config::TrainConfig;

/// Everything a run needs: network shape plus training/evaluation settings.
///
/// Missing sections and fields fall back to their defaults, so
/// `{ "network": { "hidden_size": 100 } }` is a complete file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub network: NetworkConfig,
    pub training: TrainConfig,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.network.validate()?;
        self.training.validate()
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Reads and validates a JSON config file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => NetworkError::FileNotFound(path.to_path_buf()),
            _ => NetworkError::Io(e),
        })?;
        let config: Config = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }
}
