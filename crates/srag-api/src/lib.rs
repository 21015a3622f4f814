//! JSON REST API for the SRAG dashboard.
//!
//! Exposes an axum [`Router`] backed by any [`srag_core::store::CaseStore`].
//! Every route is read-only; TLS and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", srag_api::api_router(store.clone()))
//! ```

pub mod cases;
pub mod error;
pub mod metrics;
pub mod regions;

use std::sync::Arc;

use axum::{Json, Router, routing::get};
use srag_core::store::CaseStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: CaseStore + 'static,
{
  Router::new()
    .route("/metrics", get(metrics::handler::<S>))
    .route("/cases", get(cases::handler::<S>))
    .route("/regions", get(regions::handler::<S>))
    .route("/health", get(health))
    .with_state(store)
}

/// `GET /health`
async fn health() -> Json<serde_json::Value> {
  Json(serde_json::json!({
    "status":    "ok",
    "timestamp": chrono::Utc::now().to_rfc3339(),
  }))
}

// ─── Integration tests ────────────────────────────────────────────────────────
