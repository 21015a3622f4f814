//! A [`CaseStore`] wrapper that refuses the Nth `insert_cases` call.

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;
use srag_core::{
  case::CaseRecord,
  filter::CaseFilter,
  metric::{MetricSnapshot, NewSnapshot, Period},
  store::{CaseCriterion, CaseStore},
};
use srag_store_sqlite::SqliteStore;

#[derive(Debug, thiserror::Error)]
pub enum FailingStoreError {
  #[error("insert refused")]
  Refused,
  #[error(transparent)]
  Store(#[from] srag_store_sqlite::Error),
}

/// Delegates to an in-memory [`SqliteStore`]; the `fail_on`th insert
/// (1-based) errors without touching the inner store.
pub struct FailingStore {
  pub inner:          SqliteStore,
  fail_on:            usize,
  inserts:            AtomicUsize,
  snapshot_calls:     AtomicUsize,
}

impl FailingStore {
  pub async fn new(fail_on: usize) -> Self {
    Self {
      inner: SqliteStore::open_in_memory().await.expect("in-memory store"),
      fail_on,
      inserts: AtomicUsize::new(0),
      snapshot_calls: AtomicUsize::new(0),
    }
  }

  pub fn snapshot_calls(&self) -> usize { self.snapshot_calls.load(Ordering::SeqCst) }
}

impl CaseStore for FailingStore {
  type Error = FailingStoreError;

  async fn insert_cases(&self, cases: Vec<CaseRecord>) -> Result<usize, Self::Error> {
    let call = self.inserts.fetch_add(1, Ordering::SeqCst) + 1;
    if call == self.fail_on {
      return Err(FailingStoreError::Refused);
    }
    Ok(self.inner.insert_cases(cases).await?)
  }

  async fn record_snapshots(
    &self,
    snapshots: Vec<NewSnapshot>,
  ) -> Result<usize, Self::Error> {
    self.snapshot_calls.fetch_add(1, Ordering::SeqCst);
    Ok(self.inner.record_snapshots(snapshots).await?)
  }

  async fn count_cases<'a>(
    &'a self,
    filter: &'a CaseFilter,
    criterion: CaseCriterion,
  ) -> Result<u64, Self::Error> {
    Ok(self.inner.count_cases(filter, criterion).await?)
  }

  async fn notification_dates<'a>(
    &'a self,
    filter: &'a CaseFilter,
  ) -> Result<Vec<NaiveDate>, Self::Error> {
    Ok(self.inner.notification_dates(filter).await?)
  }

  async fn latest_notification_date(&self) -> Result<Option<NaiveDate>, Self::Error> {
    Ok(self.inner.latest_notification_date().await?)
  }

  async fn localities(&self) -> Result<Vec<(String, String)>, Self::Error> {
    Ok(self.inner.localities().await?)
  }

  async fn latest_snapshots<'a>(
    &'a self,
    period: Period,
    region: Option<&'a str>,
    limit: usize,
  ) -> Result<Vec<MetricSnapshot>, Self::Error> {
    Ok(self.inner.latest_snapshots(period, region, limit).await?)
  }
}
