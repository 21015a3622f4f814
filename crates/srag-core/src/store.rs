//! The `CaseStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `srag-store-sqlite`).
//! The calculators in this crate, the HTTP layer and the ingestion job depend
//! on this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::NaiveDate;

use crate::{
  case::{CaseRecord, Outcome},
  filter::CaseFilter,
  metric::{MetricSnapshot, NewSnapshot, Period},
};

/// Extra condition applied on top of a [`CaseFilter`] when counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseCriterion {
  All,
  Outcome(Outcome),
  /// `hospitalized` is known to be true.
  Hospitalized,
  /// `icu` is known to be true.
  InIcu,
  /// `vaccinated` is known to be true.
  Vaccinated,
}

/// Abstraction over the record store.
///
/// Case records are insert-only; the store deduplicates them on
/// [`CaseRecord::natural_key`]. Snapshots are insert-only as well, one row per
/// (metric type, period, region, reference date).
pub trait CaseStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Insert `cases` in a single transaction, skipping any whose natural key
  /// is already stored. Returns the number of rows actually inserted.
  fn insert_cases(
    &self,
    cases: Vec<CaseRecord>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Insert snapshots, skipping duplicates. Returns the number inserted.
  fn record_snapshots(
    &self,
    snapshots: Vec<NewSnapshot>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Count records matching `filter` and `criterion`.
  fn count_cases<'a>(
    &'a self,
    filter: &'a CaseFilter,
    criterion: CaseCriterion,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  /// Notification dates of every record matching `filter`, ascending.
  fn notification_dates<'a>(
    &'a self,
    filter: &'a CaseFilter,
  ) -> impl Future<Output = Result<Vec<NaiveDate>, Self::Error>> + Send + 'a;

  /// The most recent notification date in the store, if any.
  fn latest_notification_date(
    &self,
  ) -> impl Future<Output = Result<Option<NaiveDate>, Self::Error>> + Send + '_;

  /// Every distinct `(state, municipality)` pair, ordered by state then
  /// municipality.
  fn localities(
    &self,
  ) -> impl Future<Output = Result<Vec<(String, String)>, Self::Error>> + Send + '_;

  /// The `limit` most recent snapshots for `period` and `region` (`None`
  /// selects national snapshots), newest reference date first.
  fn latest_snapshots<'a>(
    &'a self,
    period: Period,
    region: Option<&'a str>,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<MetricSnapshot>, Self::Error>> + Send + 'a;
}
