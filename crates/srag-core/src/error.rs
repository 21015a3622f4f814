//! Error types for `srag-core`.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid date range: {start} is after {end}")]
  InvalidDateRange { start: NaiveDate, end: NaiveDate },

  #[error("invalid date: {0:?}")]
  InvalidDate(String),

  #[error("unknown period: {0:?}")]
  UnknownPeriod(String),

  #[error("unknown metric type: {0:?}")]
  UnknownMetricType(String),

  #[error("unknown sex code: {0:?}")]
  UnknownSex(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
