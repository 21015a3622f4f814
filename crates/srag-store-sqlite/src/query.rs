//! WHERE-clause construction for case queries.

use rusqlite::types::Value;
use srag_core::{filter::CaseFilter, store::CaseCriterion};

use crate::encode::encode_date;

/// Conditions joined with `AND`, plus their positional parameters.
#[derive(Debug, Default)]
pub struct Conditions {
  clauses: Vec<&'static str>,
  params:  Vec<Value>,
}

impl Conditions {
  pub fn for_filter(filter: &CaseFilter) -> Self {
    let mut c = Self::default();
    if let Some(state) = filter.state() {
      c.push("state = ?", Value::Text(state.to_owned()));
    }
    if let Some(municipality) = filter.municipality() {
      c.push("municipality = ?", Value::Text(municipality.to_owned()));
    }
    if let Some(range) = filter.date_range() {
      c.push("notification_date >= ?", Value::Text(encode_date(range.from)));
      if let Some(until) = range.until {
        c.push("notification_date < ?", Value::Text(encode_date(until)));
      }
    }
    c
  }

  pub fn with_criterion(mut self, criterion: CaseCriterion) -> Self {
    match criterion {
      CaseCriterion::All => {}
      CaseCriterion::Outcome(outcome) => {
        self.push("outcome = ?", Value::Text(outcome.code().to_owned()));
      }
      CaseCriterion::Hospitalized => self.clauses.push("hospitalized = 1"),
      CaseCriterion::InIcu => self.clauses.push("icu = 1"),
      CaseCriterion::Vaccinated => self.clauses.push("vaccinated = 1"),
    }
    self
  }

  fn push(&mut self, clause: &'static str, param: Value) {
    self.clauses.push(clause);
    self.params.push(param);
  }

  /// `WHERE ...`, or an empty string when there are no conditions.
  pub fn where_clause(&self) -> String {
    if self.clauses.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", self.clauses.join(" AND "))
    }
  }

  pub fn into_params(self) -> Vec<Value> { self.params }
}
