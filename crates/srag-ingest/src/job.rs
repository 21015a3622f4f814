//! The full ingestion job: import the extract (or a synthetic sample when no
//! extract is present), then record national metric snapshots.

use std::path::PathBuf;

use chrono::Utc;
use srag_core::{metrics::record_snapshots, store::CaseStore};
use srag_csv::sample_rows;

use crate::{
  Error, Result,
  import::{DEFAULT_BATCH_SIZE, ImportSummary, import_rows},
};

/// Rows synthesized when the extract file is missing.
pub const SAMPLE_SIZE: usize = 1000;

#[derive(Debug, Clone)]
pub struct JobOptions {
  pub csv_path:       PathBuf,
  pub batch_size:     usize,
  pub skip_snapshots: bool,
}

impl Default for JobOptions {
  fn default() -> Self {
    Self {
      csv_path:       PathBuf::from("data/srag_sample.csv"),
      batch_size:     DEFAULT_BATCH_SIZE,
      skip_snapshots: false,
    }
  }
}

/// Where the imported rows came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
  Extract,
  Sample,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
  pub source:    Source,
  pub import:    ImportSummary,
  /// Snapshots inserted; `None` when the job was skipped or the store is
  /// empty.
  pub snapshots: Option<usize>,
}

pub async fn run<S: CaseStore>(store: &S, opts: &JobOptions) -> Result<JobReport> {
  let (source, import) = if opts.csv_path.exists() {
    tracing::info!(path = %opts.csv_path.display(), "reading extract");
    let expected = srag_csv::count_rows(&opts.csv_path)?;
    let rows = srag_csv::open(&opts.csv_path)?;
    tracing::info!(rows = expected, "extract opened");
    let summary = import_rows(store, rows, opts.batch_size, Some(expected)).await?;
    (Source::Extract, summary)
  } else {
    tracing::warn!(
      path = %opts.csv_path.display(),
      count = SAMPLE_SIZE,
      "extract not found; importing synthetic sample"
    );
    let rows = sample_rows(&mut rand::rng(), SAMPLE_SIZE, Utc::now().date_naive());
    let summary = import_rows(
      store,
      rows.into_iter().map(Ok),
      opts.batch_size,
      Some(SAMPLE_SIZE as u64),
    )
    .await?;
    (Source::Sample, summary)
  };

  let snapshots = if opts.skip_snapshots {
    tracing::info!("skipping metric snapshots");
    None
  } else {
    record_snapshots(store).await.map_err(Error::store)?
  };

  Ok(JobReport { source, import, snapshots })
}
