//! Handler for `GET /regions`.

use std::sync::Arc;

use axum::{Json, extract::State};
use srag_core::{
  regions::{Region, list_regions},
  store::CaseStore,
};

use crate::error::ApiError;

/// `GET /regions`
pub async fn handler<S: CaseStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Region>>, ApiError> {
  let regions = list_regions(store.as_ref())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(regions))
}

