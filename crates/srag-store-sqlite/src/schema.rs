//! SQL schema for the SRAG SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Case records are insert-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS cases (
    case_key             TEXT PRIMARY KEY,  -- SHA-256 hex over every field
    notification_date    TEXT NOT NULL,     -- YYYY-MM-DD
    symptom_onset_date   TEXT,
    state                TEXT NOT NULL,
    municipality         TEXT NOT NULL,
    age                  INTEGER,
    sex                  TEXT,              -- 'M' | 'F' | NULL
    fever                INTEGER,           -- 1 | 0 | NULL (unknown)
    cough                INTEGER,
    dyspnea              INTEGER,
    low_saturation       INTEGER,
    hospitalized         INTEGER,
    hospitalization_date TEXT,
    icu                  INTEGER,
    icu_entry_date       TEXT,
    vaccinated           INTEGER,
    vaccine_doses        INTEGER,           -- 1..3 or NULL
    outcome              TEXT,              -- 'cure' | 'death' | NULL
    outcome_date         TEXT,
    imported_at          TEXT NOT NULL      -- RFC 3339 UTC
);

-- Precomputed indicator values; superseded by later reference dates,
-- never overwritten.
CREATE TABLE IF NOT EXISTS metric_snapshots (
    snapshot_id    TEXT PRIMARY KEY,
    metric_type    TEXT NOT NULL,  -- 'case_rate' | 'mortality_rate' | 'icu_rate' | 'vaccination_rate'
    value          REAL NOT NULL,
    period         TEXT NOT NULL,  -- 'daily' | 'weekly' | 'monthly' | 'yearly'
    region         TEXT,           -- NULL = national
    reference_date TEXT NOT NULL,  -- YYYY-MM-DD
    recorded_at    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS cases_notified_idx ON cases(notification_date);
CREATE INDEX IF NOT EXISTS cases_region_idx   ON cases(state, municipality);

CREATE UNIQUE INDEX IF NOT EXISTS metric_snapshots_natural_idx
    ON metric_snapshots(metric_type, period, IFNULL(region, ''), reference_date);
CREATE INDEX IF NOT EXISTS metric_snapshots_lookup_idx
    ON metric_snapshots(period, region, reference_date);

PRAGMA user_version = 1;
";
