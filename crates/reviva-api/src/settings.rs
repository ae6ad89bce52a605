//! Handlers for `/config`.

use axum::{Json, extract::State};
use reviva_core::{
  config::{CampaignConfig, ConfigPatch},
  generator::TextGenerator,
  store::CustomerStore,
};

use crate::{ApiState, error::ApiError};

/// `GET /config`
pub async fn get<S, G>(
  State(state): State<ApiState<S, G>>,
) -> Result<Json<CampaignConfig>, ApiError>
where
  S: CustomerStore,
  G: TextGenerator,
{
  let config = state.store.config().await.map_err(ApiError::store)?;
  Ok(Json(config))
}

/// `PATCH /config` — fields left out of the body keep their values.
pub async fn update<S, G>(
  State(state): State<ApiState<S, G>>,
  Json(patch): Json<ConfigPatch>,
) -> Result<Json<CampaignConfig>, ApiError>
where
  S: CustomerStore,
  G: TextGenerator,
{
  let config = state.store.update_config(patch).await.map_err(ApiError::store)?;
  Ok(Json(config))
}
