//! Error types for the ingestion job.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to read extract: {0}")]
  Csv(#[from] srag_csv::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Error::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
