//! HTTP server for the SRAG dashboard.
//!
//! Mounts the [`srag_api`] router under `/api` over a SQLite store.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use serde::Deserialize;
use srag_store_sqlite::SqliteStore;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `SRAG_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String { "0.0.0.0".to_string() }

fn default_port() -> u16 { 3001 }

fn default_store_path() -> PathBuf { PathBuf::from("srag.db") }

impl ServerConfig {
  /// Layer an optional TOML file under `SRAG_*` environment variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("SRAG").try_parsing(true))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The complete application: the API under `/api`, with request tracing.
pub fn app(store: SqliteStore) -> Router {
  Router::new()
    .nest("/api", srag_api::api_router(Arc::new(store)))
    .layer(TraceLayer::new_for_http())
}
