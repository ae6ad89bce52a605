//! Handlers for `/customers` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/customers` | Optional `?q=` matches name or contact |
//! | `POST`   | `/customers` | Body: [`NewCustomer`]; returns 201 |
//! | `POST`   | `/customers/import` | Body: `[NewCustomer]`; returns 201 |
//! | `POST`   | `/customers/demo` | Adds the demo customers for today |
//! | `GET`    | `/customers/:id` | 404 if not found |
//! | `DELETE` | `/customers/:id` | Always 204 |
//! | `POST`   | `/customers/:id/messages` | Body: `{"content":"..."}`; always 204 |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use reviva_core::{
  customer::{Customer, NewCustomer},
  demo::demo_customers,
  generator::TextGenerator,
  store::{CustomerQuery, CustomerStore},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub q: Option<String>,
}

/// `GET /customers[?q=<text>]`
pub async fn list<S, G>(
  State(state): State<ApiState<S, G>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Customer>>, ApiError>
where
  S: CustomerStore,
  G: TextGenerator,
{
  let query = CustomerQuery { text: params.q };
  let customers = state
    .store
    .list_customers(&query)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(customers))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /customers` — returns 201 + the stored [`Customer`].
pub async fn create<S, G>(
  State(state): State<ApiState<S, G>>,
  Json(body): Json<NewCustomer>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CustomerStore,
  G: TextGenerator,
{
  let customer = state.store.add_customer(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(customer)))
}

/// `POST /customers/import` — body is a JSON array of [`NewCustomer`].
pub async fn import<S, G>(
  State(state): State<ApiState<S, G>>,
  Json(body): Json<Vec<NewCustomer>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CustomerStore,
  G: TextGenerator,
{
  let customers = state
    .store
    .import_customers(body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(customers)))
}

/// `POST /customers/demo`
pub async fn import_demo<S, G>(
  State(state): State<ApiState<S, G>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CustomerStore,
  G: TextGenerator,
{
  let demo = demo_customers(state.campaign.today());
  let customers = state
    .store
    .import_customers(demo)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(customers)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /customers/:id`
pub async fn get_one<S, G>(
  State(state): State<ApiState<S, G>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Customer>, ApiError>
where
  S: CustomerStore,
  G: TextGenerator,
{
  let customer = state
    .store
    .get_customer(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("customer {id} not found")))?;
  Ok(Json(customer))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /customers/:id` — deleting an unknown id is not an error.
pub async fn delete_one<S, G>(
  State(state): State<ApiState<S, G>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: CustomerStore,
  G: TextGenerator,
{
  state.store.delete_customer(id).await.map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Log message ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LogBody {
  pub content: String,
}

/// `POST /customers/:id/messages` — records a sent birthday message.
/// Unknown ids are silently ignored.
pub async fn log_message<S, G>(
  State(state): State<ApiState<S, G>>,
  Path(id): Path<Uuid>,
  Json(body): Json<LogBody>,
) -> Result<StatusCode, ApiError>
where
  S: CustomerStore,
  G: TextGenerator,
{
  state
    .store
    .log_message(id, body.content)
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}
