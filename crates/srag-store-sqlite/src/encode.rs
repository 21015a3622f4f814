//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Calendar dates are stored as `YYYY-MM-DD` so string comparison is date
//! comparison. Timestamps are RFC 3339 strings; UUIDs are hyphenated
//! lowercase strings. Tri-state flags are nullable integers.

use chrono::{DateTime, NaiveDate, Utc};
use srag_core::metric::{MetricSnapshot, MetricType, Period};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── Dates ───────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `metric_snapshots` row.
pub struct RawSnapshot {
  pub snapshot_id:    String,
  pub metric_type:    String,
  pub value:          f64,
  pub period:         String,
  pub region:         Option<String>,
  pub reference_date: String,
  pub recorded_at:    String,
}

impl RawSnapshot {
  pub fn into_snapshot(self) -> Result<MetricSnapshot> {
    Ok(MetricSnapshot {
      snapshot_id:    decode_uuid(&self.snapshot_id)?,
      metric_type:    self.metric_type.parse::<MetricType>()?,
      value:          self.value,
      period:         self.period.parse::<Period>()?,
      region:         self.region,
      reference_date: decode_date(&self.reference_date)?,
      recorded_at:    decode_dt(&self.recorded_at)?,
    })
  }
}
