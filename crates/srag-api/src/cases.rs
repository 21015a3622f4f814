//! Handler for `GET /cases`.
//!
//! | Param | Notes |
//! |-------|-------|
//! | `groupBy` | `daily\|monthly\|yearly`, default `monthly`; anything else groups by year |
//! | `estado`, `municipio` | Region filters |
//! | `startDate`, `endDate` | Inclusive ISO dates; only applied when both are given |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use srag_core::{
  filter::{CaseFilter, parse_iso_date},
  grouping::{CaseSeries, Granularity, case_series, series_range},
  store::CaseStore,
};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CasesParams {
  #[serde(rename = "groupBy")]
  pub group_by:   Option<String>,
  pub estado:     Option<String>,
  pub municipio:  Option<String>,
  #[serde(rename = "startDate")]
  pub start_date: Option<String>,
  #[serde(rename = "endDate")]
  pub end_date:   Option<String>,
}

fn parse_opt_date(s: Option<&str>) -> srag_core::Result<Option<NaiveDate>> {
  s.filter(|s| !s.trim().is_empty()).map(parse_iso_date).transpose()
}

/// `GET /cases[?groupBy=..&estado=..&municipio=..&startDate=..&endDate=..]`
pub async fn handler<S: CaseStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<CasesParams>,
) -> Result<Json<CaseSeries>, ApiError> {
  let granularity = params
    .group_by
    .as_deref()
    .map_or(Granularity::default(), Granularity::from_param);
  let start = parse_opt_date(params.start_date.as_deref())?;
  let end = parse_opt_date(params.end_date.as_deref())?;
  let range = series_range(start, end, Utc::now().date_naive())?;

  let filter =
    CaseFilter::new(params.estado, params.municipio).with_date_range(range);
  let series = case_series(store.as_ref(), &filter, granularity)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(series))
}
