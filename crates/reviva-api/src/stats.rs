//! Handler for `GET /stats`.

use axum::{Json, extract::State};
use reviva_core::{generator::TextGenerator, stats::DashboardStats, store::CustomerStore};

use crate::{ApiState, error::ApiError};

/// `GET /stats`
pub async fn handler<S, G>(
  State(state): State<ApiState<S, G>>,
) -> Result<Json<DashboardStats>, ApiError>
where
  S: CustomerStore,
  G: TextGenerator,
{
  let stats = state.store.stats().await.map_err(ApiError::store)?;
  Ok(Json(stats))
}
