//! Case records — one row per reported SRAG case.
//!
//! Records are created in bulk by the ingestion job and are never updated or
//! deleted afterwards. The only write-time reconciliation is deduplication by
//! [`CaseRecord::natural_key`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// Municipality recorded when the extract leaves `ID_MUNICIP` blank.
pub const UNKNOWN_MUNICIPALITY: &str = "Unknown";

// ─── Coded fields ────────────────────────────────────────────────────────────

/// Patient sex as coded in the extract (`CS_SEXO`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
  #[serde(rename = "M")]
  Male,
  #[serde(rename = "F")]
  Female,
}

impl Sex {
  pub fn code(self) -> &'static str {
    match self {
      Self::Male => "M",
      Self::Female => "F",
    }
  }

  pub fn from_code(s: &str) -> Result<Self> {
    match s {
      "M" => Ok(Self::Male),
      "F" => Ok(Self::Female),
      other => Err(Error::UnknownSex(other.to_owned())),
    }
  }
}

/// Case outcome (`EVOLUCAO`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
  Cure,
  Death,
}

impl Outcome {
  pub fn code(self) -> &'static str {
    match self {
      Self::Cure => "cure",
      Self::Death => "death",
    }
  }
}

// ─── CaseRecord ──────────────────────────────────────────────────────────────

/// A normalized case record.
///
/// Every `Option<bool>` is a tri-state clinical flag: `None` means the extract
/// marked the field as unknown or left it blank, which is distinct from
/// `Some(false)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
  pub notification_date:    NaiveDate,
  pub symptom_onset_date:   Option<NaiveDate>,
  /// Two-letter UF code, e.g. `"SP"`.
  pub state:                String,
  pub municipality:         String,
  pub age:                  Option<i32>,
  pub sex:                  Option<Sex>,
  pub fever:                Option<bool>,
  pub cough:                Option<bool>,
  pub dyspnea:              Option<bool>,
  pub low_saturation:       Option<bool>,
  pub hospitalized:         Option<bool>,
  pub hospitalization_date: Option<NaiveDate>,
  pub icu:                  Option<bool>,
  pub icu_entry_date:       Option<NaiveDate>,
  pub vaccinated:           Option<bool>,
  /// Number of affirmative dose fields (1–3); `None` when zero.
  pub vaccine_doses:        Option<u8>,
  pub outcome:              Option<Outcome>,
  pub outcome_date:         Option<NaiveDate>,
}

impl CaseRecord {
  /// A record with only the required fields set.
  pub fn new(notification_date: NaiveDate, state: impl Into<String>) -> Self {
    Self {
      notification_date,
      symptom_onset_date: None,
      state: state.into(),
      municipality: UNKNOWN_MUNICIPALITY.to_owned(),
      age: None,
      sex: None,
      fever: None,
      cough: None,
      dyspnea: None,
      low_saturation: None,
      hospitalized: None,
      hospitalization_date: None,
      icu: None,
      icu_entry_date: None,
      vaccinated: None,
      vaccine_doses: None,
      outcome: None,
      outcome_date: None,
    }
  }

  /// Lowercase hex SHA-256 over every field of the record.
  ///
  /// Two rows carrying identical values produce the same key, so re-importing
  /// an extract inserts nothing new.
  pub fn natural_key(&self) -> String {
    let fields = [
      encode_date(Some(self.notification_date)),
      encode_date(self.symptom_onset_date),
      self.state.clone(),
      self.municipality.clone(),
      self.age.map(|a| a.to_string()).unwrap_or_default(),
      self.sex.map(Sex::code).unwrap_or_default().to_owned(),
      encode_flag(self.fever),
      encode_flag(self.cough),
      encode_flag(self.dyspnea),
      encode_flag(self.low_saturation),
      encode_flag(self.hospitalized),
      encode_date(self.hospitalization_date),
      encode_flag(self.icu),
      encode_date(self.icu_entry_date),
      encode_flag(self.vaccinated),
      self.vaccine_doses.map(|d| d.to_string()).unwrap_or_default(),
      self.outcome.map(Outcome::code).unwrap_or_default().to_owned(),
      encode_date(self.outcome_date),
    ];

    let mut hasher = Sha256::new();
    for field in &fields {
      hasher.update(field.as_bytes());
      // Unit separator keeps ("ab", "") and ("a", "b") apart.
      hasher.update([0x1f]);
    }
    hex::encode(hasher.finalize())
  }
}

fn encode_date(d: Option<NaiveDate>) -> String {
  d.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

fn encode_flag(f: Option<bool>) -> String {
  match f {
    Some(true) => "1".to_owned(),
    Some(false) => "0".to_owned(),
    None => String::new(),
  }
}
