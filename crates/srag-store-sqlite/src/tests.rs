//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Days, NaiveDate};
use srag_core::{
  case::{CaseRecord, Outcome},
  filter::{CaseFilter, DateRange},
  grouping::{Granularity, case_series},
  metric::{MetricType, MetricsReport, NewSnapshot, Period},
  metrics::{get_metrics, live_metrics, record_snapshots},
  regions::{Region, list_regions},
  store::{CaseCriterion, CaseStore},
};

use crate::{SqliteStore, expand_tilde};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn case(notified: NaiveDate, state: &str, municipality: &str) -> CaseRecord {
  let mut c = CaseRecord::new(notified, state);
  c.municipality = municipality.to_owned();
  c
}

fn today() -> NaiveDate { date(2024, 6, 30) }

fn days_ago(n: u64) -> NaiveDate { today().checked_sub_days(Days::new(n)).unwrap() }

// ─── Paths ───────────────────────────────────────────────────────────────────

#[test]
fn tilde_paths_expand_to_home() {
  let plain = std::path::Path::new("/var/lib/srag.db");
  assert_eq!(expand_tilde(plain), plain);

  if let Ok(home) = std::env::var("HOME") {
    let expanded = expand_tilde(std::path::Path::new("~/srag.db"));
    assert_eq!(expanded, std::path::Path::new(&home).join("srag.db"));
  }
}

#[tokio::test]
async fn open_creates_a_file_store() {
  let path = std::env::temp_dir()
    .join(format!("srag-store-{}.db", std::process::id()));
  let s = SqliteStore::open(&path).await.unwrap();
  s.insert_cases(vec![case(date(2024, 3, 5), "SP", "A")]).await.unwrap();
  drop(s);

  let reopened = SqliteStore::open(&path).await.unwrap();
  let total = reopened.count_cases(&CaseFilter::all(), CaseCriterion::All).await.unwrap();
  assert_eq!(total, 1);
  drop(reopened);
  std::fs::remove_file(&path).ok();
}

// ─── Inserts ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_count_cases() {
  let s = store().await;
  let inserted = s
    .insert_cases(vec![
      case(date(2024, 3, 5), "SP", "Campinas"),
      case(date(2024, 3, 6), "RJ", "Niterói"),
    ])
    .await
    .unwrap();
  assert_eq!(inserted, 2);

  let total = s.count_cases(&CaseFilter::all(), CaseCriterion::All).await.unwrap();
  assert_eq!(total, 2);
}

#[tokio::test]
async fn duplicate_records_are_skipped() {
  let s = store().await;
  let batch = vec![
    case(date(2024, 3, 5), "SP", "Campinas"),
    case(date(2024, 3, 6), "SP", "Campinas"),
  ];

  assert_eq!(s.insert_cases(batch.clone()).await.unwrap(), 2);
  assert_eq!(s.insert_cases(batch).await.unwrap(), 0);

  let total = s.count_cases(&CaseFilter::all(), CaseCriterion::All).await.unwrap();
  assert_eq!(total, 2);
}

#[tokio::test]
async fn empty_batch_is_a_no_op() {
  let s = store().await;
  assert_eq!(s.insert_cases(Vec::new()).await.unwrap(), 0);
  assert_eq!(s.latest_notification_date().await.unwrap(), None);
}

// ─── Counting ────────────────────────────────────────────────────────────────

async fn clinical_store() -> SqliteStore {
  let s = store().await;

  let mut died_in_icu = case(date(2024, 1, 10), "SP", "Campinas");
  died_in_icu.hospitalized = Some(true);
  died_in_icu.icu = Some(true);
  died_in_icu.outcome = Some(Outcome::Death);

  let mut hospitalized = case(date(2024, 1, 11), "SP", "Santos");
  hospitalized.hospitalized = Some(true);
  hospitalized.icu = Some(false);
  hospitalized.vaccinated = Some(true);
  hospitalized.outcome = Some(Outcome::Cure);

  let mut unknowns = case(date(2024, 1, 12), "RJ", "Niterói");
  unknowns.vaccinated = None;
  unknowns.hospitalized = None;

  s.insert_cases(vec![died_in_icu, hospitalized, unknowns])
    .await
    .unwrap();
  s
}

#[tokio::test]
async fn criteria_count_only_known_true_flags() {
  let s = clinical_store().await;
  let count = async |c: CaseCriterion| {
    s.count_cases(&CaseFilter::all(), c).await.unwrap()
  };

  assert_eq!(count(CaseCriterion::All).await, 3);
  assert_eq!(count(CaseCriterion::Outcome(Outcome::Death)).await, 1);
  assert_eq!(count(CaseCriterion::Outcome(Outcome::Cure)).await, 1);
  assert_eq!(count(CaseCriterion::Hospitalized).await, 2);
  assert_eq!(count(CaseCriterion::InIcu).await, 1);
  assert_eq!(count(CaseCriterion::Vaccinated).await, 1);
}

#[tokio::test]
async fn state_and_municipality_filters_combine() {
  let s = clinical_store().await;

  let sp = CaseFilter::new(Some("SP".into()), None);
  assert_eq!(s.count_cases(&sp, CaseCriterion::All).await.unwrap(), 2);

  let santos = CaseFilter::new(Some("SP".into()), Some("Santos".into()));
  assert_eq!(s.count_cases(&santos, CaseCriterion::All).await.unwrap(), 1);

  let mismatched = CaseFilter::new(Some("RJ".into()), Some("Santos".into()));
  assert_eq!(s.count_cases(&mismatched, CaseCriterion::All).await.unwrap(), 0);
}

#[tokio::test]
async fn date_range_is_half_open() {
  let s = clinical_store().await;
  let filter = CaseFilter::all()
    .with_date_range(DateRange::between(date(2024, 1, 10), date(2024, 1, 12)));
  assert_eq!(s.count_cases(&filter, CaseCriterion::All).await.unwrap(), 2);

  let since = CaseFilter::all().with_date_range(DateRange::since(date(2024, 1, 12)));
  assert_eq!(s.count_cases(&since, CaseCriterion::All).await.unwrap(), 1);
}

// ─── Dates and regions ───────────────────────────────────────────────────────

#[tokio::test]
async fn notification_dates_are_ascending() {
  let s = store().await;
  s.insert_cases(vec![
    case(date(2024, 5, 1), "SP", "A"),
    case(date(2023, 1, 1), "SP", "A"),
    case(date(2024, 2, 1), "RJ", "A"),
  ])
  .await
  .unwrap();

  let dates = s.notification_dates(&CaseFilter::all()).await.unwrap();
  assert_eq!(dates, [date(2023, 1, 1), date(2024, 2, 1), date(2024, 5, 1)]);

  let latest = s.latest_notification_date().await.unwrap();
  assert_eq!(latest, Some(date(2024, 5, 1)));
}

#[tokio::test]
async fn regions_are_listed_alphabetically() {
  let s = store().await;
  s.insert_cases(vec![
    case(date(2024, 1, 1), "SP", "A"),
    case(date(2024, 1, 2), "SP", "B"),
    case(date(2024, 1, 3), "RJ", "A"),
    case(date(2024, 1, 4), "SP", "A"),
  ])
  .await
  .unwrap();

  let regions = list_regions(&s).await.unwrap();
  assert_eq!(
    regions,
    vec![
      Region { state: "RJ".into(), municipalities: vec!["A".into()] },
      Region {
        state:          "SP".into(),
        municipalities: vec!["A".into(), "B".into()],
      },
    ]
  );
}

#[tokio::test]
async fn empty_store_has_no_regions() {
  let s = store().await;
  assert!(list_regions(&s).await.unwrap().is_empty());
}

// ─── Case series ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn case_series_groups_filtered_records() {
  let s = store().await;
  s.insert_cases(vec![
    case(date(2024, 1, 5), "SP", "A"),
    case(date(2024, 1, 20), "SP", "B"),
    case(date(2024, 3, 1), "SP", "A"),
    case(date(2024, 3, 2), "RJ", "A"),
    case(date(2022, 3, 2), "SP", "A"),
  ])
  .await
  .unwrap();

  let filter = CaseFilter::new(Some("SP".into()), None).with_date_range(
    DateRange::inclusive(date(2024, 1, 1), date(2024, 12, 31)).unwrap(),
  );
  let series = case_series(&s, &filter, Granularity::Monthly).await.unwrap();

  assert_eq!(series.total, 3);
  let keys: Vec<_> = series.data.iter().map(|b| (b.key.as_str(), b.count)).collect();
  assert_eq!(keys, [("2024-01", 2), ("2024-03", 1)]);
}

// ─── Snapshots ───────────────────────────────────────────────────────────────

fn snapshot(metric_type: MetricType, value: f64, region: Option<&str>, day: u32) -> NewSnapshot {
  NewSnapshot {
    metric_type,
    value,
    period: Period::Monthly,
    region: region.map(str::to_owned),
    reference_date: date(2024, 3, day),
  }
}

#[tokio::test]
async fn snapshots_are_deduplicated_per_reference_date() {
  let s = store().await;
  let batch = vec![
    snapshot(MetricType::CaseRate, 1.0, None, 5),
    snapshot(MetricType::CaseRate, 2.0, Some("SP"), 5),
  ];
  assert_eq!(s.record_snapshots(batch.clone()).await.unwrap(), 2);
  assert_eq!(s.record_snapshots(batch).await.unwrap(), 0);
}

#[tokio::test]
async fn latest_snapshots_match_period_and_region() {
  let s = store().await;
  s.record_snapshots(vec![
    snapshot(MetricType::CaseRate, 1.0, None, 1),
    snapshot(MetricType::CaseRate, 3.0, None, 9),
    snapshot(MetricType::IcuRate, 2.0, None, 5),
    snapshot(MetricType::CaseRate, 9.0, Some("SP"), 20),
  ])
  .await
  .unwrap();

  let national = s.latest_snapshots(Period::Monthly, None, 2).await.unwrap();
  let values: Vec<_> = national.iter().map(|s| s.value).collect();
  assert_eq!(values, [3.0, 2.0]);

  let sp = s.latest_snapshots(Period::Monthly, Some("SP"), 4).await.unwrap();
  assert_eq!(sp.len(), 1);
  assert_eq!(sp[0].region.as_deref(), Some("SP"));

  let weekly = s.latest_snapshots(Period::Weekly, None, 4).await.unwrap();
  assert!(weekly.is_empty());
}

// ─── Metrics calculator ──────────────────────────────────────────────────────

/// 4 recent cases, 2 in the previous window, 1 older; 2 deaths, 2 of 4
/// hospitalized in ICU, 3 vaccinated.
async fn metrics_store() -> SqliteStore {
  let s = store().await;
  let mut cases = Vec::new();
  for (i, n) in [1u64, 5, 10, 29, 31, 59, 200].into_iter().enumerate() {
    let mut c = case(days_ago(n), "SP", &format!("M{i}"));
    c.outcome = Some(if i < 2 { Outcome::Death } else { Outcome::Cure });
    c.hospitalized = Some(i < 4);
    c.icu = Some(i < 2);
    c.vaccinated = Some(i >= 4);
    cases.push(c);
  }
  s.insert_cases(cases).await.unwrap();
  s
}

#[tokio::test]
async fn live_metrics_follow_the_rate_definitions() {
  let s = metrics_store().await;
  let m = live_metrics(&s, &CaseFilter::all(), today()).await.unwrap();

  assert_eq!(m.case_rate.value, 100.0);
  assert_eq!(m.mortality_rate.value, 2.0 / 7.0 * 100.0);
  assert_eq!(m.icu_rate.value, 50.0);
  assert_eq!(m.vaccination_rate.value, 3.0 / 7.0 * 100.0);
  assert_eq!(m.case_rate.reference_date, None);
}

#[tokio::test]
async fn live_windows_split_at_thirty_days() {
  let s = store().await;
  let cases = [29u64, 30, 59, 60]
    .into_iter()
    .map(|n| case(days_ago(n), "SP", &format!("D{n}")))
    .collect();
  s.insert_cases(cases).await.unwrap();

  // Day 29 is recent; days 30 and 59 are previous; day 60 is in neither.
  let m = live_metrics(&s, &CaseFilter::all(), today()).await.unwrap();
  assert_eq!(m.case_rate.value, -50.0);
}

#[tokio::test]
async fn flat_daily_series_has_zero_growth() {
  let s = store().await;
  let cases = (0..=60u64)
    .map(|n| case(days_ago(n), "SP", "A"))
    .collect();
  s.insert_cases(cases).await.unwrap();

  let m = live_metrics(&s, &CaseFilter::all(), today()).await.unwrap();
  assert_eq!(m.case_rate.value, 0.0);
}

#[tokio::test]
async fn live_metrics_on_empty_store_are_zero() {
  let s = store().await;
  let m = live_metrics(&s, &CaseFilter::all(), today()).await.unwrap();
  for t in MetricType::ALL {
    assert_eq!(m.get(t).value, 0.0, "{t:?}");
  }
}

#[tokio::test]
async fn get_metrics_falls_back_to_live_without_snapshots() {
  let s = metrics_store().await;
  let report = get_metrics(&s, Period::Monthly, &CaseFilter::all(), today())
    .await
    .unwrap();
  assert!(matches!(report, MetricsReport::Live(_)));
  assert_eq!(report.metrics().icu_rate.value, 50.0);
}

#[tokio::test]
async fn get_metrics_prefers_snapshots() {
  let s = metrics_store().await;
  s.record_snapshots(
    MetricType::ALL
      .into_iter()
      .map(|t| snapshot(t, 42.0, None, 5))
      .collect(),
  )
  .await
  .unwrap();

  let report = get_metrics(&s, Period::Monthly, &CaseFilter::all(), today())
    .await
    .unwrap();
  assert!(report.is_snapshot());
  let m = report.metrics();
  assert_eq!(m.mortality_rate.value, 42.0);
  assert_eq!(m.mortality_rate.reference_date, Some(date(2024, 3, 5)));
  assert_eq!(m.mortality_rate.period, Some(Period::Monthly));
}

#[tokio::test]
async fn partial_regional_snapshot_masks_live_values() {
  let s = metrics_store().await;
  s.record_snapshots(vec![snapshot(MetricType::CaseRate, 7.5, Some("SP"), 5)])
    .await
    .unwrap();

  let filter = CaseFilter::new(Some("SP".into()), None);
  let report = get_metrics(&s, Period::Monthly, &filter, today()).await.unwrap();

  assert!(report.is_snapshot());
  let m = report.metrics();
  assert_eq!(m.case_rate.value, 7.5);
  // Live values would be non-zero; the snapshot set wins as a whole.
  assert_eq!(m.mortality_rate.value, 0.0);
  assert_eq!(m.icu_rate.value, 0.0);
  assert_eq!(m.vaccination_rate.value, 0.0);
}

#[tokio::test]
async fn snapshot_lookup_uses_municipality_when_state_is_absent() {
  let s = metrics_store().await;
  s.record_snapshots(vec![snapshot(MetricType::IcuRate, 11.0, Some("M0"), 5)])
    .await
    .unwrap();

  let filter = CaseFilter::new(None, Some("M0".into()));
  let report = get_metrics(&s, Period::Monthly, &filter, today()).await.unwrap();
  assert_eq!(report.metrics().icu_rate.value, 11.0);

  // With a state present the municipality snapshot is not consulted.
  let filter = CaseFilter::new(Some("SP".into()), Some("M0".into()));
  let report = get_metrics(&s, Period::Monthly, &filter, today()).await.unwrap();
  assert!(matches!(report, MetricsReport::Live(_)));
}

// ─── Snapshot job ────────────────────────────────────────────────────────────

#[tokio::test]
async fn snapshot_job_anchors_windows_on_latest_case() {
  let s = store().await;
  // Latest case is 2023-06-30; windows end there, not at the wall clock.
  let anchor = date(2023, 6, 30);
  let mut cases = Vec::new();
  for n in [0u64, 3, 40] {
    cases.push(case(anchor.checked_sub_days(Days::new(n)).unwrap(), "SP", "A"));
  }
  let mut dead = case(anchor.checked_sub_days(Days::new(45)).unwrap(), "RJ", "B");
  dead.outcome = Some(Outcome::Death);
  cases.push(dead);
  s.insert_cases(cases).await.unwrap();

  assert_eq!(record_snapshots(&s).await.unwrap(), Some(4));

  let snaps = s.latest_snapshots(Period::Monthly, None, 4).await.unwrap();
  assert_eq!(snaps.len(), 4);
  assert!(snaps.iter().all(|s| s.reference_date == anchor));
  let value = |t: MetricType| snaps.iter().find(|s| s.metric_type == t).unwrap().value;
  assert_eq!(value(MetricType::CaseRate), 0.0);
  assert_eq!(value(MetricType::MortalityRate), 25.0);

  // Re-running on unchanged data records nothing new.
  assert_eq!(record_snapshots(&s).await.unwrap(), Some(0));
}

#[tokio::test]
async fn snapshot_job_on_empty_store_records_nothing() {
  let s = store().await;
  assert_eq!(record_snapshots(&s).await.unwrap(), None);
  let snaps = s.latest_snapshots(Period::Monthly, None, 4).await.unwrap();
  assert!(snaps.is_empty());
}
