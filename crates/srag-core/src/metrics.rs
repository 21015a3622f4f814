//! The metrics calculator.
//!
//! Dashboard indicators come from one of two places:
//!
//! 1. The most recent stored snapshots for the requested period and region.
//! 2. When no snapshot matches at all, a live aggregation over case records.
//!
//! The choice is made per request, not per metric: if any snapshot matches,
//! metric types missing from the snapshot set read as 0 rather than being
//! computed live. [`MetricsReport`] records which path was taken.

use chrono::{Days, NaiveDate};

use crate::{
  case::Outcome,
  filter::{CaseFilter, DateRange},
  metric::{
    DashboardMetrics, MetricSnapshot, MetricType, MetricValue, MetricsReport,
    NewSnapshot, Period,
  },
  store::{CaseCriterion, CaseStore},
};

/// How many snapshots one request reads; one per metric type.
pub const SNAPSHOT_LOOKUP_LIMIT: usize = 4;

/// Width in days of the case-growth comparison windows.
pub const CASE_RATE_WINDOW_DAYS: u64 = 30;

// ─── Counts and rates ────────────────────────────────────────────────────────

/// Raw counts the four rates are derived from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaseCounts {
  pub total:        u64,
  pub deaths:       u64,
  pub hospitalized: u64,
  pub in_icu:       u64,
  pub vaccinated:   u64,
  /// Notified within the trailing window.
  pub recent:       u64,
  /// Notified within the window before that.
  pub previous:     u64,
}

/// The four indicators as plain percentages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rates {
  pub case_rate:        f64,
  pub mortality_rate:   f64,
  pub icu_rate:         f64,
  pub vaccination_rate: f64,
}

impl Rates {
  /// Every rate with a zero denominator is 0.
  pub fn from_counts(c: &CaseCounts) -> Self {
    let case_rate = if c.previous > 0 {
      (c.recent as f64 - c.previous as f64) / c.previous as f64 * 100.0
    } else {
      0.0
    };
    Self {
      case_rate,
      mortality_rate: percent(c.deaths, c.total),
      icu_rate: percent(c.in_icu, c.hospitalized),
      vaccination_rate: percent(c.vaccinated, c.total),
    }
  }

  pub fn get(&self, metric: MetricType) -> f64 {
    match metric {
      MetricType::CaseRate => self.case_rate,
      MetricType::MortalityRate => self.mortality_rate,
      MetricType::IcuRate => self.icu_rate,
      MetricType::VaccinationRate => self.vaccination_rate,
    }
  }

  fn into_live_metrics(self) -> DashboardMetrics {
    DashboardMetrics {
      case_rate:        MetricValue::live(self.case_rate),
      mortality_rate:   MetricValue::live(self.mortality_rate),
      icu_rate:         MetricValue::live(self.icu_rate),
      vaccination_rate: MetricValue::live(self.vaccination_rate),
    }
  }
}

fn percent(part: u64, whole: u64) -> f64 {
  if whole == 0 {
    return 0.0;
  }
  part as f64 / whole as f64 * 100.0
}

// ─── Growth windows ──────────────────────────────────────────────────────────

/// The two consecutive notification-date windows compared by the case rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthWindows {
  pub recent:   DateRange,
  /// Ends where `recent` starts.
  pub previous: DateRange,
}

impl GrowthWindows {
  /// Windows ending at the current instant on `today`.
  ///
  /// A record notified on `today - 30` is already older than `now - 30 days`,
  /// so each window holds exactly 30 calendar dates and `today` falls in the
  /// recent one.
  pub fn trailing(today: NaiveDate) -> Self {
    Self::starting_at(today, CASE_RATE_WINDOW_DAYS - 1)
  }

  /// Windows anchored at midnight of `reference`, which itself counts as
  /// recent along with the 30 dates before it.
  pub fn anchored(reference: NaiveDate) -> Self {
    Self::starting_at(reference, CASE_RATE_WINDOW_DAYS)
  }

  fn starting_at(end: NaiveDate, recent_days: u64) -> Self {
    let recent_from = end
      .checked_sub_days(Days::new(recent_days))
      .unwrap_or(NaiveDate::MIN);
    let previous_from = recent_from
      .checked_sub_days(Days::new(CASE_RATE_WINDOW_DAYS))
      .unwrap_or(NaiveDate::MIN);
    Self {
      recent:   DateRange::since(recent_from),
      previous: DateRange::between(previous_from, recent_from),
    }
  }
}

// ─── Aggregation ─────────────────────────────────────────────────────────────

/// Gather [`CaseCounts`] for `filter` over `windows`.
///
/// Any date range already on `filter` is ignored.
pub async fn count_cases<S: CaseStore>(
  store: &S,
  filter: &CaseFilter,
  windows: GrowthWindows,
) -> Result<CaseCounts, S::Error> {
  let base = CaseFilter::new(
    filter.state().map(str::to_owned),
    filter.municipality().map(str::to_owned),
  );
  let recent = base.clone().with_date_range(windows.recent);
  let previous = base.clone().with_date_range(windows.previous);

  Ok(CaseCounts {
    total:        store.count_cases(&base, CaseCriterion::All).await?,
    deaths:       store
      .count_cases(&base, CaseCriterion::Outcome(Outcome::Death))
      .await?,
    hospitalized: store.count_cases(&base, CaseCriterion::Hospitalized).await?,
    in_icu:       store.count_cases(&base, CaseCriterion::InIcu).await?,
    vaccinated:   store.count_cases(&base, CaseCriterion::Vaccinated).await?,
    recent:       store.count_cases(&recent, CaseCriterion::All).await?,
    previous:     store.count_cases(&previous, CaseCriterion::All).await?,
  })
}

/// Compute the four indicators directly from case records.
///
/// `today` anchors the growth windows; the HTTP layer passes the wall-clock
/// date, so results move with real time even over a static dataset.
pub async fn live_metrics<S: CaseStore>(
  store: &S,
  filter: &CaseFilter,
  today: NaiveDate,
) -> Result<DashboardMetrics, S::Error> {
  let counts = count_cases(store, filter, GrowthWindows::trailing(today)).await?;
  Ok(Rates::from_counts(&counts).into_live_metrics())
}

/// Build dashboard metrics from a snapshot set.
///
/// Snapshots are expected newest first; the first snapshot of each type wins
/// and missing types read as 0.
pub fn from_snapshots(snapshots: &[MetricSnapshot]) -> DashboardMetrics {
  let pick = |metric: MetricType| {
    snapshots
      .iter()
      .find(|s| s.metric_type == metric)
      .map(MetricValue::from)
      .unwrap_or_default()
  };
  DashboardMetrics {
    case_rate:        pick(MetricType::CaseRate),
    mortality_rate:   pick(MetricType::MortalityRate),
    icu_rate:         pick(MetricType::IcuRate),
    vaccination_rate: pick(MetricType::VaccinationRate),
  }
}

/// Dashboard metrics for `period` and `filter`: stored snapshots when any
/// match, live computation otherwise.
pub async fn get_metrics<S: CaseStore>(
  store: &S,
  period: Period,
  filter: &CaseFilter,
  today: NaiveDate,
) -> Result<MetricsReport, S::Error> {
  let region = filter.region_key();
  let snapshots = store
    .latest_snapshots(period, region, SNAPSHOT_LOOKUP_LIMIT)
    .await?;

  if snapshots.is_empty() {
    tracing::debug!(%period, ?region, "no snapshots; computing live metrics");
    let metrics = live_metrics(store, filter, today).await?;
    return Ok(MetricsReport::Live(metrics));
  }

  tracing::debug!(%period, ?region, found = snapshots.len(), "serving snapshots");
  Ok(MetricsReport::Snapshot(from_snapshots(&snapshots)))
}

// ─── Snapshot job ────────────────────────────────────────────────────────────

/// Compute national rates and store them as `monthly` snapshots.
///
/// The growth windows are anchored at the latest notification date in the
/// store rather than today. Returns the number of snapshots inserted, or
/// `None` when the store holds no cases.
pub async fn record_snapshots<S: CaseStore>(
  store: &S,
) -> Result<Option<usize>, S::Error> {
  let Some(latest) = store.latest_notification_date().await? else {
    tracing::warn!("no cases found; skipping metric snapshots");
    return Ok(None);
  };

  let windows = GrowthWindows::anchored(latest);
  let counts = count_cases(store, &CaseFilter::all(), windows).await?;
  let rates = Rates::from_counts(&counts);
  tracing::info!(reference_date = %latest, ?counts, "calculated national metrics");

  let snapshots = MetricType::ALL
    .into_iter()
    .map(|metric_type| NewSnapshot {
      metric_type,
      value: rates.get(metric_type),
      period: Period::Monthly,
      region: None,
      reference_date: latest,
    })
    .collect();

  let inserted = store.record_snapshots(snapshots).await?;
  Ok(Some(inserted))
}
