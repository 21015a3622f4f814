//! Time-bucketed case counts for the dashboard chart.

use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
  Result,
  filter::{CaseFilter, DateRange},
  store::CaseStore,
};

/// Bucket width for [`group`].
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
  Daily,
  #[default]
  Monthly,
  Yearly,
}

impl Granularity {
  /// Parse a `groupBy` parameter. Anything unrecognised groups by year.
  pub fn from_param(s: &str) -> Self {
    match s {
      "daily" => Self::Daily,
      "monthly" => Self::Monthly,
      _ => Self::Yearly,
    }
  }

  /// Zero-padded key, so lexicographic order is chronological order.
  pub fn bucket_key(self, date: NaiveDate) -> String {
    match self {
      Self::Daily => date.format("%Y-%m-%d").to_string(),
      Self::Monthly => format!("{:04}-{:02}", date.year(), date.month()),
      Self::Yearly => format!("{:04}", date.year()),
    }
  }
}

/// One point of the case series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
  #[serde(rename = "date")]
  pub key:   String,
  pub count: u64,
}

/// The series returned to the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseSeries {
  pub data:  Vec<Bucket>,
  /// Number of records that went into `data`.
  pub total: u64,
}

/// Count `dates` per bucket, sorted ascending by bucket key.
pub fn group<I>(dates: I, granularity: Granularity) -> Vec<Bucket>
where
  I: IntoIterator<Item = NaiveDate>,
{
  let mut counts: BTreeMap<String, u64> = BTreeMap::new();
  for date in dates {
    *counts.entry(granularity.bucket_key(date)).or_default() += 1;
  }
  counts
    .into_iter()
    .map(|(key, count)| Bucket { key, count })
    .collect()
}

/// The notification-date window for a series request.
///
/// An explicit range is only honoured when both ends are supplied; otherwise
/// the series covers the trailing year up to `today`, not counting the date
/// exactly one year back.
pub fn series_range(
  start: Option<NaiveDate>,
  end: Option<NaiveDate>,
  today: NaiveDate,
) -> Result<DateRange> {
  match (start, end) {
    (Some(start), Some(end)) => DateRange::inclusive(start, end),
    _ => {
      // The date a year back lies before `now - 1 year`, so it is excluded.
      let from = today
        .checked_sub_months(Months::new(12))
        .and_then(|d| d.succ_opt())
        .unwrap_or(NaiveDate::MIN);
      Ok(DateRange::since(from))
    }
  }
}

/// Fetch the matching notification dates and group them.
pub async fn case_series<S: CaseStore>(
  store: &S,
  filter: &CaseFilter,
  granularity: Granularity,
) -> Result<CaseSeries, S::Error> {
  let dates = store.notification_dates(filter).await?;
  let total = dates.len() as u64;
  tracing::debug!(total, ?granularity, "grouping case series");
  Ok(CaseSeries { data: group(dates, granularity), total })
}
