//! Handlers for `/campaign/targets` endpoints.
//!
//! Generation and delivery run in the background; their endpoints answer
//! 202 with the target as it stands once the work has been started. Poll
//! `GET /campaign/targets/:id` to observe completion.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use reviva_campaign::Target;
use reviva_core::{
  generator::{Style, TextGenerator},
  store::CustomerStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

/// `GET /campaign/targets`
pub async fn list<S, G>(
  State(state): State<ApiState<S, G>>,
) -> Result<Json<Vec<Target>>, ApiError>
where
  S: CustomerStore + 'static,
  G: TextGenerator,
{
  Ok(Json(state.campaign.targets().await?))
}

/// `GET /campaign/targets/:id`
pub async fn get_one<S, G>(
  State(state): State<ApiState<S, G>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Target>, ApiError>
where
  S: CustomerStore + 'static,
  G: TextGenerator,
{
  Ok(Json(state.campaign.target(id).await?))
}

// ─── Draft ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DraftBody {
  pub text: String,
}

/// `PUT /campaign/targets/:id/draft`
pub async fn edit_draft<S, G>(
  State(state): State<ApiState<S, G>>,
  Path(id): Path<Uuid>,
  Json(body): Json<DraftBody>,
) -> Result<Json<Target>, ApiError>
where
  S: CustomerStore + 'static,
  G: TextGenerator,
{
  if body.text.trim().is_empty() {
    return Err(ApiError::BadRequest("draft text must not be empty".into()));
  }
  Ok(Json(state.campaign.edit_draft(id, body.text).await?))
}

// ─── Generate ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateBody {
  #[serde(default)]
  pub style: Style,
}

/// `POST /campaign/targets/:id/generate` — `{}` asks for the `friendly`
/// style.
pub async fn generate<S, G>(
  State(state): State<ApiState<S, G>>,
  Path(id): Path<Uuid>,
  Json(body): Json<GenerateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CustomerStore + 'static,
  G: TextGenerator,
{
  // The task is detached; its result lands in the draft map.
  let _ = state.campaign.start_generation(id, body.style).await?;
  let target = state.campaign.target(id).await?;
  Ok((StatusCode::ACCEPTED, Json(target)))
}

// ─── Send ─────────────────────────────────────────────────────────────────────

/// `POST /campaign/targets/:id/send`
pub async fn send<S, G>(
  State(state): State<ApiState<S, G>>,
  Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CustomerStore + 'static,
  G: TextGenerator,
{
  let _ = state.campaign.start_send(id).await?;
  let target = state.campaign.target(id).await?;
  Ok((StatusCode::ACCEPTED, Json(target)))
}
