//! Raw row → [`CaseRecord`] normalization.
//!
//! Every field parses softly: a malformed value becomes unknown instead of
//! failing the row. A row is only dropped when it has no usable notification
//! date or no state code.

use chrono::NaiveDate;
use srag_core::case::{CaseRecord, Outcome, Sex, UNKNOWN_MUNICIPALITY};

use crate::{RawRow, fields};

/// Trimmed value of `code`, or `None` when absent or blank.
fn field<'a>(row: &'a RawRow, code: &str) -> Option<&'a str> {
  row.get(code).map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Parse a `DD/MM/YYYY` date. Missing or malformed input yields `None`.
pub fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(value?.trim(), "%d/%m/%Y").ok()
}

/// Parse a tri-state flag: `"1"` is true, blank or `"9"` is unknown, and any
/// other code is false.
pub fn parse_flag(value: Option<&str>) -> Option<bool> {
  match value.map(str::trim) {
    None | Some("") | Some("9") => None,
    Some("1") => Some(true),
    Some(_) => Some(false),
  }
}

/// Leading-integer parse: `"45"`, `" 45"` and `"45.0"` all give 45.
fn parse_age(value: Option<&str>) -> Option<i32> {
  let s = value?.trim_start();
  let end = s
    .char_indices()
    .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && c == '-')))
    .map_or(s.len(), |(i, _)| i);
  s[..end].parse().ok()
}

fn parse_sex(value: Option<&str>) -> Option<Sex> {
  value.and_then(|v| Sex::from_code(v).ok())
}

fn parse_outcome(value: Option<&str>) -> Option<Outcome> {
  match value? {
    "1" => Some(Outcome::Cure),
    "2" => Some(Outcome::Death),
    _ => None,
  }
}

fn count_doses(row: &RawRow) -> Option<u8> {
  let doses = fields::DOSES
    .iter()
    .filter(|code| parse_flag(field(row, code)) == Some(true))
    .count() as u8;
  (doses > 0).then_some(doses)
}

/// Normalize one row, or `None` when it lacks a notification date or state.
pub fn transform_row(row: &RawRow) -> Option<CaseRecord> {
  let notification_date = parse_date(field(row, fields::NOTIFICATION_DATE))?;
  let state = field(row, fields::STATE)?;
  let flag = |code| parse_flag(field(row, code));
  let date = |code| parse_date(field(row, code));

  Some(CaseRecord {
    notification_date,
    symptom_onset_date: date(fields::SYMPTOM_ONSET_DATE),
    state: state.to_owned(),
    municipality: field(row, fields::MUNICIPALITY)
      .unwrap_or(UNKNOWN_MUNICIPALITY)
      .to_owned(),
    age: parse_age(field(row, fields::AGE)),
    sex: parse_sex(field(row, fields::SEX)),
    fever: flag(fields::FEVER),
    cough: flag(fields::COUGH),
    dyspnea: flag(fields::DYSPNEA),
    low_saturation: flag(fields::LOW_SATURATION),
    hospitalized: flag(fields::HOSPITALIZED),
    hospitalization_date: date(fields::HOSPITALIZATION_DATE),
    icu: flag(fields::ICU),
    icu_entry_date: date(fields::ICU_ENTRY_DATE),
    vaccinated: flag(fields::VACCINATED),
    vaccine_doses: count_doses(row),
    outcome: parse_outcome(field(row, fields::OUTCOME)),
    outcome_date: date(fields::OUTCOME_DATE),
  })
}

/// Lazily normalize `rows`, silently skipping rows [`transform_row`] rejects.
pub fn transform<I>(rows: I) -> impl Iterator<Item = CaseRecord>
where
  I: IntoIterator<Item = RawRow>,
{
  rows.into_iter().filter_map(|row| transform_row(&row))
}
