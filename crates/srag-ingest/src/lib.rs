//! Batch loader for SRAG surveillance extracts.
//!
//! Streams a semicolon-delimited extract through [`srag_csv`], imports the
//! resulting case records in batches, and records national metric
//! snapshots for the dashboard.

pub mod config;
pub mod error;
pub mod import;
pub mod job;

#[cfg(test)]
mod failing_store;

pub use error::{Error, Result};
pub use import::{ImportSummary, import_rows};
pub use job::{JobOptions, JobReport, Source, run};
