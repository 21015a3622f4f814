//! Batched import of extract rows into a [`CaseStore`].
//!
//! Rows are transformed as they stream past and buffered into batches; each
//! batch is one store transaction with skip-duplicate semantics. A store
//! failure aborts the import but leaves earlier batches committed, so the
//! job can simply be re-run.

use srag_core::{case::CaseRecord, store::CaseStore};
use srag_csv::{RawRow, transform_row};

use crate::{Error, Result};

pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Aggregate outcome of one import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
  /// Rows decoded from the source, usable or not.
  pub rows_read: u64,
  /// Rows that survived the transform and were sent to the store.
  pub submitted: u64,
  /// Records the store actually inserted; duplicates are not counted.
  pub inserted:  u64,
  pub batches:   u64,
}

impl ImportSummary {
  /// Rows the transform discarded.
  pub fn dropped(&self) -> u64 { self.rows_read - self.submitted }
}

/// Transform and import `rows`.
///
/// `expected` is the total row count when known in advance and only feeds
/// progress logging. Unreadable records are skipped with a warning; an I/O
/// failure on the source ends the import with an error.
pub async fn import_rows<S, I>(
  store: &S,
  rows: I,
  batch_size: usize,
  expected: Option<u64>,
) -> Result<ImportSummary>
where
  S: CaseStore,
  I: IntoIterator<Item = srag_csv::Result<RawRow>>,
{
  let batch_size = batch_size.max(1);
  let mut summary = ImportSummary::default();
  let mut batch: Vec<CaseRecord> = Vec::with_capacity(batch_size);

  for row in rows {
    let row = match row {
      Ok(row) => row,
      Err(e) if e.is_io() => return Err(e.into()),
      Err(e) => {
        tracing::warn!(error = %e, "skipping unreadable row");
        continue;
      }
    };
    summary.rows_read += 1;

    if let Some(case) = transform_row(&row) {
      batch.push(case);
    }
    if batch.len() >= batch_size {
      flush(store, &mut batch, &mut summary, expected).await?;
    }
  }
  if !batch.is_empty() {
    flush(store, &mut batch, &mut summary, expected).await?;
  }

  tracing::info!(
    rows_read = summary.rows_read,
    dropped = summary.dropped(),
    inserted = summary.inserted,
    batches = summary.batches,
    "import finished"
  );
  Ok(summary)
}

async fn flush<S: CaseStore>(
  store: &S,
  batch: &mut Vec<CaseRecord>,
  summary: &mut ImportSummary,
  expected: Option<u64>,
) -> Result<()> {
  let submitted = batch.len() as u64;
  let inserted = store
    .insert_cases(std::mem::take(batch))
    .await
    .map_err(Error::store)?;

  summary.submitted += submitted;
  summary.inserted += inserted as u64;
  summary.batches += 1;

  match expected {
    Some(total) => tracing::info!(
      imported = summary.rows_read,
      total,
      inserted,
      "batch {} committed",
      summary.batches
    ),
    None => tracing::info!(
      imported = summary.rows_read,
      inserted,
      "batch {} committed",
      summary.batches
    ),
  }
  Ok(())
}
