//! Metric types and precomputed snapshots.
//!
//! A snapshot is a rate computed by the batch job and stored for fast
//! retrieval. Snapshots are never overwritten: a newer reference date
//! supersedes older rows, and readers always take the most recent.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Error;

// ─── MetricType ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
  /// Percentage change of the trailing 30 days over the 30 days before.
  CaseRate,
  /// Deaths over total cases.
  MortalityRate,
  /// ICU admissions over hospitalizations.
  IcuRate,
  /// Vaccinated over total cases.
  VaccinationRate,
}

impl MetricType {
  pub const ALL: [MetricType; 4] = [
    MetricType::CaseRate,
    MetricType::MortalityRate,
    MetricType::IcuRate,
    MetricType::VaccinationRate,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::CaseRate => "case_rate",
      Self::MortalityRate => "mortality_rate",
      Self::IcuRate => "icu_rate",
      Self::VaccinationRate => "vaccination_rate",
    }
  }
}

impl FromStr for MetricType {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|t| t.as_str() == s)
      .ok_or_else(|| Error::UnknownMetricType(s.to_owned()))
  }
}

// ─── Period ──────────────────────────────────────────────────────────────────

/// Granularity a snapshot was computed for.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Period {
  Daily,
  Weekly,
  #[default]
  Monthly,
  Yearly,
}

impl Period {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Daily => "daily",
      Self::Weekly => "weekly",
      Self::Monthly => "monthly",
      Self::Yearly => "yearly",
    }
  }
}

impl FromStr for Period {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "daily" => Ok(Self::Daily),
      "weekly" => Ok(Self::Weekly),
      "monthly" => Ok(Self::Monthly),
      "yearly" => Ok(Self::Yearly),
      other => Err(Error::UnknownPeriod(other.to_owned())),
    }
  }
}

impl fmt::Display for Period {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Snapshots ───────────────────────────────────────────────────────────────

/// Input to [`crate::store::CaseStore::record_snapshots`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewSnapshot {
  pub metric_type:    MetricType,
  pub value:          f64,
  pub period:         Period,
  /// `None` means national.
  pub region:         Option<String>,
  pub reference_date: NaiveDate,
}

/// A stored snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
  pub snapshot_id:    Uuid,
  pub metric_type:    MetricType,
  pub value:          f64,
  pub period:         Period,
  pub region:         Option<String>,
  pub reference_date: NaiveDate,
  /// Server-assigned insertion time.
  pub recorded_at:    DateTime<Utc>,
}

// ─── Dashboard values ────────────────────────────────────────────────────────

/// One indicator as served to the dashboard.
///
/// `period` and `reference_date` are only present when the value came from a
/// snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricValue {
  pub value:          f64,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub period:         Option<Period>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub reference_date: Option<NaiveDate>,
}

impl MetricValue {
  pub fn live(value: f64) -> Self { Self { value, ..Self::default() } }
}

impl From<&MetricSnapshot> for MetricValue {
  fn from(s: &MetricSnapshot) -> Self {
    Self {
      value:          s.value,
      period:         Some(s.period),
      reference_date: Some(s.reference_date),
    }
  }
}

/// The four dashboard indicators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
  pub case_rate:        MetricValue,
  pub mortality_rate:   MetricValue,
  pub icu_rate:         MetricValue,
  pub vaccination_rate: MetricValue,
}

impl DashboardMetrics {
  pub fn get(&self, metric: MetricType) -> &MetricValue {
    match metric {
      MetricType::CaseRate => &self.case_rate,
      MetricType::MortalityRate => &self.mortality_rate,
      MetricType::IcuRate => &self.icu_rate,
      MetricType::VaccinationRate => &self.vaccination_rate,
    }
  }
}

/// Which path of the calculator produced a set of metrics.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricsReport {
  /// Built from stored snapshots; types missing from the set read as 0.
  Snapshot(DashboardMetrics),
  /// Computed on the fly from case records.
  Live(DashboardMetrics),
}

impl MetricsReport {
  pub fn metrics(&self) -> &DashboardMetrics {
    match self {
      Self::Snapshot(m) | Self::Live(m) => m,
    }
  }

  pub fn into_metrics(self) -> DashboardMetrics {
    match self {
      Self::Snapshot(m) | Self::Live(m) => m,
    }
  }

  pub fn source(&self) -> &'static str {
    match self {
      Self::Snapshot(_) => "snapshot",
      Self::Live(_) => "live",
    }
  }

  pub fn is_snapshot(&self) -> bool { matches!(self, Self::Snapshot(_)) }
}
