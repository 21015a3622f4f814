//! Handler for `GET /metrics`.
//!
//! | Param | Notes |
//! |-------|-------|
//! | `period` | `daily\|weekly\|monthly\|yearly`, default `monthly` |
//! | `estado` | State filter; also the snapshot region when present |
//! | `municipio` | Municipality filter |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use srag_core::{
  filter::CaseFilter,
  metric::{DashboardMetrics, Period},
  metrics::get_metrics,
  store::CaseStore,
};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct MetricsParams {
  pub period:    Option<String>,
  pub estado:    Option<String>,
  pub municipio: Option<String>,
}

/// The four indicators plus where they came from.
#[derive(Debug, Serialize)]
pub struct MetricsResponse {
  #[serde(flatten)]
  pub metrics: DashboardMetrics,
  /// `"snapshot"` or `"live"`.
  pub source:  &'static str,
}

/// `GET /metrics[?period=..&estado=..&municipio=..]`
pub async fn handler<S: CaseStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<MetricsParams>,
) -> Result<Json<MetricsResponse>, ApiError> {
  let period = match params.period.as_deref().map(str::trim) {
    None | Some("") => Period::default(),
    Some(p) => p.parse::<Period>()?,
  };
  let filter = CaseFilter::new(params.estado, params.municipio);
  let today = Utc::now().date_naive();

  let report = get_metrics(store.as_ref(), period, &filter, today)
    .await
    .map_err(ApiError::store)?;

  Ok(Json(MetricsResponse {
    source:  report.source(),
    metrics: report.into_metrics(),
  }))
}
