//! `srag-ingest` — load an SRAG extract into the dashboard store.
//!
//! # Usage
//!
//! ```text
//! srag-ingest --csv data/INFLUD24.csv --store srag.db
//! srag-ingest --config config.toml --batch-size 5000 --skip-snapshots
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use srag_ingest::{JobOptions, Source, config::IngestConfig};
use srag_store_sqlite::{SqliteStore, expand_tilde};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "srag-ingest", about = "Load an SRAG extract into the dashboard store")]
struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
  config: PathBuf,

  /// Semicolon-delimited extract to import.
  #[arg(long, value_name = "PATH")]
  csv: Option<PathBuf>,

  /// SQLite database file.
  #[arg(long, value_name = "PATH")]
  store: Option<PathBuf>,

  /// Records per insert transaction.
  #[arg(long, value_name = "N")]
  batch_size: Option<usize>,

  /// Import only; do not record metric snapshots.
  #[arg(long)]
  skip_snapshots: bool,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  // CLI flags override the config file, which overrides defaults.
  let mut cfg = IngestConfig::load(&args.config)
    .with_context(|| format!("loading config from {}", args.config.display()))?;
  if let Some(csv) = args.csv {
    cfg.csv_path = csv;
  }
  if let Some(store) = args.store {
    cfg.store_path = store;
  }
  if let Some(n) = args.batch_size {
    cfg.batch_size = n;
  }

  let store_path = &cfg.store_path;
  let store = SqliteStore::open(store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let opts = JobOptions {
    csv_path:       expand_tilde(&cfg.csv_path),
    batch_size:     cfg.batch_size,
    skip_snapshots: args.skip_snapshots,
  };
  let report = srag_ingest::run(&store, &opts).await.context("ingestion failed")?;

  let source = match report.source {
    Source::Extract => "extract",
    Source::Sample => "synthetic sample",
  };
  tracing::info!(
    source,
    rows_read = report.import.rows_read,
    inserted = report.import.inserted,
    snapshots = ?report.snapshots,
    "ingestion complete"
  );
  Ok(())
}
