//! [`SqliteStore`] — the SQLite implementation of [`CaseStore`].

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use srag_core::{
  case::{CaseRecord, Outcome, Sex},
  filter::CaseFilter,
  metric::{MetricSnapshot, NewSnapshot, Period},
  store::{CaseCriterion, CaseStore},
};
use uuid::Uuid;

use crate::{
  Result,
  encode::{RawSnapshot, decode_date, encode_date, encode_dt, encode_uuid},
  query::Conditions,
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An SRAG record store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  ///
  /// A leading `~/` in `path` is expanded to the user's home directory.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(expand_tilde(path.as_ref())).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/") {
    if let Ok(home) = std::env::var("HOME") {
      return PathBuf::from(home).join(rest);
    }
  }
  path.to_path_buf()
}

// ─── CaseStore impl ──────────────────────────────────────────────────────────

impl CaseStore for SqliteStore {
  type Error = crate::Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn insert_cases(&self, cases: Vec<CaseRecord>) -> Result<usize> {
    let keyed: Vec<(String, CaseRecord)> = cases
      .into_iter()
      .map(|c| (c.natural_key(), c))
      .collect();
    let imported_at = encode_dt(Utc::now());

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut inserted = 0;
        {
          let mut stmt = tx.prepare_cached(
            "INSERT OR IGNORE INTO cases (
               case_key, notification_date, symptom_onset_date, state,
               municipality, age, sex, fever, cough, dyspnea, low_saturation,
               hospitalized, hospitalization_date, icu, icu_entry_date,
               vaccinated, vaccine_doses, outcome, outcome_date, imported_at
             ) VALUES (
               ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
               ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20
             )",
          )?;
          for (key, c) in &keyed {
            inserted += stmt.execute(rusqlite::params![
              key,
              encode_date(c.notification_date),
              c.symptom_onset_date.map(encode_date),
              c.state,
              c.municipality,
              c.age,
              c.sex.map(Sex::code),
              c.fever,
              c.cough,
              c.dyspnea,
              c.low_saturation,
              c.hospitalized,
              c.hospitalization_date.map(encode_date),
              c.icu,
              c.icu_entry_date.map(encode_date),
              c.vaccinated,
              c.vaccine_doses,
              c.outcome.map(Outcome::code),
              c.outcome_date.map(encode_date),
              imported_at,
            ])?;
          }
        }
        tx.commit()?;
        Ok(inserted)
      })
      .await?;

    tracing::debug!(inserted, "inserted case batch");
    Ok(inserted)
  }

  async fn record_snapshots(&self, snapshots: Vec<NewSnapshot>) -> Result<usize> {
    let recorded_at = encode_dt(Utc::now());

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut inserted = 0;
        {
          let mut stmt = tx.prepare_cached(
            "INSERT OR IGNORE INTO metric_snapshots (
               snapshot_id, metric_type, value, period, region,
               reference_date, recorded_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          )?;
          for s in &snapshots {
            inserted += stmt.execute(rusqlite::params![
              encode_uuid(Uuid::new_v4()),
              s.metric_type.as_str(),
              s.value,
              s.period.as_str(),
              s.region,
              encode_date(s.reference_date),
              recorded_at,
            ])?;
          }
        }
        tx.commit()?;
        Ok(inserted)
      })
      .await?;

    Ok(inserted)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn count_cases(
    &self,
    filter:    &CaseFilter,
    criterion: CaseCriterion,
  ) -> Result<u64> {
    let conds = Conditions::for_filter(filter).with_criterion(criterion);
    let sql = format!("SELECT COUNT(*) FROM cases {}", conds.where_clause());
    let params = conds.into_params();

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(&sql, rusqlite::params_from_iter(params), |row| {
          row.get(0)
        })?)
      })
      .await?;

    Ok(count as u64)
  }

  async fn notification_dates(&self, filter: &CaseFilter) -> Result<Vec<NaiveDate>> {
    let conds = Conditions::for_filter(filter);
    let sql = format!(
      "SELECT notification_date FROM cases {} ORDER BY notification_date ASC",
      conds.where_clause()
    );
    let params = conds.into_params();

    let raws: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.iter().map(|s| decode_date(s)).collect()
  }

  async fn latest_notification_date(&self) -> Result<Option<NaiveDate>> {
    let raw: Option<String> = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT MAX(notification_date) FROM cases", [], |row| {
          row.get(0)
        })?)
      })
      .await?;

    raw.as_deref().map(decode_date).transpose()
  }

  async fn localities(&self) -> Result<Vec<(String, String)>> {
    let pairs = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT DISTINCT state, municipality
           FROM cases
           ORDER BY state ASC, municipality ASC",
        )?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<(String, String)>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(pairs)
  }

  async fn latest_snapshots(
    &self,
    period: Period,
    region: Option<&str>,
    limit:  usize,
  ) -> Result<Vec<MetricSnapshot>> {
    let period_str = period.as_str();
    let region_str = region.map(str::to_owned);
    let limit_val  = limit as i64;

    let raws: Vec<RawSnapshot> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT snapshot_id, metric_type, value, period, region,
                  reference_date, recorded_at
           FROM metric_snapshots
           WHERE period = ?1 AND region IS ?2
           ORDER BY reference_date DESC, recorded_at DESC
           LIMIT ?3",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![period_str, region_str, limit_val], |row| {
            Ok(RawSnapshot {
              snapshot_id:    row.get(0)?,
              metric_type:    row.get(1)?,
              value:          row.get(2)?,
              period:         row.get(3)?,
              region:         row.get(4)?,
              reference_date: row.get(5)?,
              recorded_at:    row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSnapshot::into_snapshot).collect()
  }
}
