//! Record filters shared by every store query.

use chrono::{DateTime, NaiveDate};

use crate::{Error, Result};

// ─── DateRange ───────────────────────────────────────────────────────────────

/// A half-open range of notification dates, `[from, until)`.
///
/// `until = None` leaves the range open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
  pub from:  NaiveDate,
  pub until: Option<NaiveDate>,
}

impl DateRange {
  /// Every date on or after `from`.
  pub fn since(from: NaiveDate) -> Self { Self { from, until: None } }

  /// Dates in `[from, until)`.
  pub fn between(from: NaiveDate, until: NaiveDate) -> Self {
    Self { from, until: Some(until) }
  }

  /// Dates in `[start, end]`, both ends included.
  pub fn inclusive(start: NaiveDate, end: NaiveDate) -> Result<Self> {
    if start > end {
      return Err(Error::InvalidDateRange { start, end });
    }
    Ok(Self { from: start, until: end.succ_opt() })
  }
}

// ─── CaseFilter ──────────────────────────────────────────────────────────────

/// Which case records a query considers.
///
/// State and municipality are applied together: a record must match every
/// field that is set. Blank strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseFilter {
  state:        Option<String>,
  municipality: Option<String>,
  date_range:   Option<DateRange>,
}

impl CaseFilter {
  pub fn new(state: Option<String>, municipality: Option<String>) -> Self {
    Self {
      state:        non_blank(state),
      municipality: non_blank(municipality),
      date_range:   None,
    }
  }

  /// A filter matching every record.
  pub fn all() -> Self { Self::default() }

  /// Replace the date range, keeping the region fields.
  pub fn with_date_range(mut self, range: DateRange) -> Self {
    self.date_range = Some(range);
    self
  }

  pub fn state(&self) -> Option<&str> { self.state.as_deref() }

  pub fn municipality(&self) -> Option<&str> { self.municipality.as_deref() }

  pub fn date_range(&self) -> Option<DateRange> { self.date_range }

  /// The single region label used to look up metric snapshots.
  ///
  /// Snapshots carry one region column, so the state wins when both fields
  /// are set and the municipality is only consulted on its own.
  pub fn region_key(&self) -> Option<&str> {
    self.state().or(self.municipality())
  }
}

fn non_blank(s: Option<String>) -> Option<String> {
  s.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

/// Parse an ISO `YYYY-MM-DD` date, or take the date part of an RFC 3339
/// timestamp.
pub fn parse_iso_date(s: &str) -> Result<NaiveDate> {
  let s = s.trim();
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.date_naive()))
    .map_err(|_| Error::InvalidDate(s.to_owned()))
}
