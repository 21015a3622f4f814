//! Job configuration: an optional TOML file layered under `SRAG_*`
//! environment variables. Command-line flags are applied on top by the
//! binary.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::import::DEFAULT_BATCH_SIZE;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct IngestConfig {
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  #[serde(default = "default_csv_path")]
  pub csv_path:   PathBuf,
  #[serde(default = "default_batch_size")]
  pub batch_size: usize,
}

fn default_store_path() -> PathBuf { PathBuf::from("srag.db") }

fn default_csv_path() -> PathBuf { PathBuf::from("data/srag_sample.csv") }

fn default_batch_size() -> usize { DEFAULT_BATCH_SIZE }

impl Default for IngestConfig {
  fn default() -> Self {
    Self {
      store_path: default_store_path(),
      csv_path:   default_csv_path(),
      batch_size: default_batch_size(),
    }
  }
}

impl IngestConfig {
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("SRAG").try_parsing(true))
      .build()?
      .try_deserialize()
  }
}
