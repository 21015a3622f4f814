//! Error types for the srag-csv reader.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

impl Error {
  /// Whether the underlying failure is an I/O failure rather than a single
  /// unreadable record.
  pub fn is_io(&self) -> bool {
    match self {
      Self::Csv(e) => e.is_io_error(),
      Self::Io(_) => true,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
