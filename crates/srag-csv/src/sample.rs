//! Synthetic extract rows for running the dashboard without real data.
//!
//! Rows are produced in the extract's own field-code layout so they go
//! through the same [`crate::transform`] path as a real file.

use chrono::{Days, NaiveDate};
use rand::Rng;

use crate::{RawRow, fields};

/// States the synthetic rows are spread over.
pub const SAMPLE_STATES: [&str; 6] = ["SP", "RJ", "MG", "BA", "PR", "RS"];

fn yes_no(yes: bool) -> &'static str { if yes { "1" } else { "2" } }

/// Generate `count` random rows notified within the 365 days up to `today`.
pub fn sample_rows<R: Rng + ?Sized>(
  rng: &mut R,
  count: usize,
  today: NaiveDate,
) -> Vec<RawRow> {
  (0..count).map(|_| sample_row(rng, today)).collect()
}

fn sample_row<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate) -> RawRow {
  let days_ago = rng.random_range(0..365);
  let notified = today.checked_sub_days(Days::new(days_ago)).unwrap_or(today);
  let doses = rng.random_range(0..=3usize);

  let mut row = RawRow::new();
  let mut set = |code: &str, value: String| {
    row.insert(code.to_owned(), value);
  };

  set(fields::NOTIFICATION_DATE, notified.format("%d/%m/%Y").to_string());
  set(
    fields::STATE,
    SAMPLE_STATES[rng.random_range(0..SAMPLE_STATES.len())].to_owned(),
  );
  set(fields::MUNICIPALITY, format!("Município {}", rng.random_range(0..100u32)));
  set(fields::AGE, rng.random_range(1..=90u32).to_string());
  set(fields::SEX, if rng.random_bool(0.5) { "M" } else { "F" }.to_owned());
  set(fields::FEVER, yes_no(rng.random_bool(0.7)).to_owned());
  set(fields::COUGH, yes_no(rng.random_bool(0.6)).to_owned());
  set(fields::DYSPNEA, yes_no(rng.random_bool(0.4)).to_owned());
  set(fields::LOW_SATURATION, yes_no(rng.random_bool(0.3)).to_owned());
  set(fields::HOSPITALIZED, yes_no(rng.random_bool(0.5)).to_owned());
  set(fields::ICU, yes_no(rng.random_bool(0.3)).to_owned());
  set(fields::VACCINATED, yes_no(rng.random_bool(0.6)).to_owned());
  for (i, code) in fields::DOSES.into_iter().enumerate() {
    set(code, yes_no(i < doses).to_owned());
  }
  set(
    fields::OUTCOME,
    if rng.random_bool(0.15) { "2" } else { "1" }.to_owned(),
  );

  row
}
