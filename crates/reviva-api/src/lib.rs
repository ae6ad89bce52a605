//! JSON REST API for Reviva.
//!
//! Exposes an axum [`Router`] over a [`Campaign`] and the
//! [`CustomerStore`] behind it. Transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", reviva_api::api_router(campaign.clone()))
//! ```

pub mod campaign;
pub mod customers;
pub mod error;
pub mod settings;
pub mod stats;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use reviva_campaign::Campaign;
use reviva_core::{generator::TextGenerator, store::CustomerStore};

pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct ApiState<S, G> {
  pub store:    Arc<S>,
  pub campaign: Arc<Campaign<S, G>>,
}

impl<S, G> Clone for ApiState<S, G> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      campaign: Arc::clone(&self.campaign),
    }
  }
}

/// Build a fully-materialised API router for `campaign`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, G>(campaign: Arc<Campaign<S, G>>) -> Router<()>
where
  S: CustomerStore + 'static,
  G: TextGenerator,
{
  let state = ApiState { store: Arc::clone(campaign.store()), campaign };

  Router::new()
    // Customers
    .route("/customers", get(customers::list::<S, G>).post(customers::create::<S, G>))
    .route("/customers/import", post(customers::import::<S, G>))
    .route("/customers/demo", post(customers::import_demo::<S, G>))
    .route(
      "/customers/{id}",
      get(customers::get_one::<S, G>).delete(customers::delete_one::<S, G>),
    )
    .route("/customers/{id}/messages", post(customers::log_message::<S, G>))
    // Settings
    .route("/config", get(settings::get::<S, G>).patch(settings::update::<S, G>))
    // Dashboard
    .route("/stats", get(stats::handler::<S, G>))
    // Campaign
    .route("/campaign/targets", get(campaign::list::<S, G>))
    .route("/campaign/targets/{id}", get(campaign::get_one::<S, G>))
    .route("/campaign/targets/{id}/draft", put(campaign::edit_draft::<S, G>))
    .route("/campaign/targets/{id}/generate", post(campaign::generate::<S, G>))
    .route("/campaign/targets/{id}/send", post(campaign::send::<S, G>))
    .with_state(state)
}

#[cfg(test)]
mod tests {
  use std::{convert::Infallible, time::Duration};

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use chrono::NaiveDate;
  use reviva_campaign::Composer;
  use reviva_core::{
    clock::FixedClock,
    config::CampaignConfig,
    generator::GenerationRequest,
  };
  use reviva_store_memory::MemoryStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;

  use super::*;

  /// Answers every request with the customer's name and style.
  struct Canned;

  impl TextGenerator for Canned {
    type Error = Infallible;

    async fn generate<'a>(
      &'a self,
      request: &'a GenerationRequest,
    ) -> Result<String, Infallible> {
      Ok(format!("Parabéns, {}! ({})", request.customer_name, request.style))
    }
  }

  fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 5, 20).unwrap() }

  fn make_campaign() -> Arc<Campaign<MemoryStore, Canned>> {
    let clock = Arc::new(FixedClock::on(today()));
    let config = CampaignConfig {
      company_name: "TechStore".into(),
      default_offer: "20% off".into(),
      message_template: "Olá [NOME]! [EMPRESA] oferece [OFERTA ESPECIAL].".into(),
      ..CampaignConfig::default()
    };
    let store = Arc::new(MemoryStore::new(config, clock.clone()));
    Arc::new(
      Campaign::new(store, Composer::with_generator(Canned), clock)
        .with_send_delay(Duration::from_millis(10)),
    )
  }

  async fn call(
    campaign: &Arc<Campaign<MemoryStore, Canned>>,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
      Some(v) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(v.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };
    let resp = api_router(campaign.clone()).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn add(
    campaign: &Arc<Campaign<MemoryStore, Canned>>,
    name: &str,
    dob: &str,
    status: &str,
  ) -> String {
    let (code, body) = call(
      campaign,
      "POST",
      "/customers",
      Some(json!({ "name": name, "date_of_birth": dob, "status": status })),
    )
    .await;
    assert_eq!(code, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
  }

  /// Poll a target until `done` holds for it.
  async fn wait_for(
    campaign: &Arc<Campaign<MemoryStore, Canned>>,
    id: &str,
    done: impl Fn(&Value) -> bool,
  ) -> Value {
    for _ in 0..200 {
      let (code, body) = call(campaign, "GET", &format!("/campaign/targets/{id}"), None).await;
      assert_eq!(code, StatusCode::OK);
      if done(&body) {
        return body;
      }
      tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("target {id} never settled");
  }

  // ── Customers ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_then_get_customer() {
    let campaign = make_campaign();
    let id = add(&campaign, "Ana", "1990-05-20", "inativo").await;

    let (code, body) = call(&campaign, "GET", &format!("/customers/{id}"), None).await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(body["name"], "Ana");
    assert_eq!(body["status"], "inactive");
    assert_eq!(body["history"], json!([]));
  }

  #[tokio::test]
  async fn malformed_date_of_birth_is_rejected() {
    let campaign = make_campaign();
    let (code, _) = call(
      &campaign,
      "POST",
      "/customers",
      Some(json!({ "name": "Ana", "date_of_birth": "20/05/1990" })),
    )
    .await;
    assert!(code.is_client_error(), "got {code}");
  }

  #[tokio::test]
  async fn get_unknown_customer_is_404() {
    let campaign = make_campaign();
    let uri = format!("/customers/{}", Uuid::new_v4());
    let (code, body) = call(&campaign, "GET", &uri, None).await;
    assert_eq!(code, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not found"));
  }

  #[tokio::test]
  async fn list_filters_by_query() {
    let campaign = make_campaign();
    add(&campaign, "Ana Souza", "1990-05-20", "inactive").await;
    add(&campaign, "Bruno Lima", "1985-01-02", "active").await;

    let (_, all) = call(&campaign, "GET", "/customers", None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, some) = call(&campaign, "GET", "/customers?q=ana", None).await;
    let some = some.as_array().unwrap();
    assert_eq!(some.len(), 1);
    assert_eq!(some[0]["name"], "Ana Souza");
  }

  #[tokio::test]
  async fn delete_is_always_no_content() {
    let campaign = make_campaign();
    let id = add(&campaign, "Ana", "1990-05-20", "inactive").await;

    let (code, _) = call(&campaign, "DELETE", &format!("/customers/{id}"), None).await;
    assert_eq!(code, StatusCode::NO_CONTENT);
    let (code, _) = call(&campaign, "DELETE", &format!("/customers/{id}"), None).await;
    assert_eq!(code, StatusCode::NO_CONTENT);
    let (code, _) = call(&campaign, "GET", &format!("/customers/{id}"), None).await;
    assert_eq!(code, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn import_and_demo_add_customers() {
    let campaign = make_campaign();
    let (code, body) = call(
      &campaign,
      "POST",
      "/customers/import",
      Some(json!([
        { "name": "Ana", "date_of_birth": "1990-05-20" },
        { "name": "Bruno", "date_of_birth": "1985-01-02", "status": "active" },
      ])),
    )
    .await;
    assert_eq!(code, StatusCode::CREATED);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (code, body) = call(&campaign, "POST", "/customers/demo", None).await;
    assert_eq!(code, StatusCode::CREATED);
    assert_eq!(body.as_array().unwrap().len(), 5);

    let (_, all) = call(&campaign, "GET", "/customers", None).await;
    assert_eq!(all.as_array().unwrap().len(), 7);
  }

  #[tokio::test]
  async fn logging_a_message_appends_history() {
    let campaign = make_campaign();
    let id = add(&campaign, "Ana", "1990-05-20", "inactive").await;

    let (code, _) = call(
      &campaign,
      "POST",
      &format!("/customers/{id}/messages"),
      Some(json!({ "content": "Oi" })),
    )
    .await;
    assert_eq!(code, StatusCode::NO_CONTENT);

    let (_, body) = call(&campaign, "GET", &format!("/customers/{id}"), None).await;
    assert_eq!(body["history"][0]["content"], "Oi");
    assert_eq!(body["history"][0]["kind"], "birthday");
    assert_eq!(body["history"][0]["delivery_status"], "sent");

    let uri = format!("/customers/{}/messages", Uuid::new_v4());
    let (code, _) = call(&campaign, "POST", &uri, Some(json!({ "content": "x" }))).await;
    assert_eq!(code, StatusCode::NO_CONTENT);
  }

  // ── Settings and stats ──────────────────────────────────────────────────────

  #[tokio::test]
  async fn config_patch_merges_fields() {
    let campaign = make_campaign();
    let (code, body) = call(
      &campaign,
      "PATCH",
      "/config",
      Some(json!({ "company_name": "MegaLoja" })),
    )
    .await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(body["company_name"], "MegaLoja");
    assert_eq!(body["default_offer"], "20% off");

    let (_, body) = call(&campaign, "GET", "/config", None).await;
    assert_eq!(body["company_name"], "MegaLoja");
  }

  #[tokio::test]
  async fn stats_reflect_store() {
    let campaign = make_campaign();
    add(&campaign, "Ana", "1990-05-20", "inactive").await;
    add(&campaign, "Bruno", "1985-01-02", "active").await;

    let (code, body) = call(&campaign, "GET", "/stats", None).await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(body["total_customers"], 2);
    assert_eq!(body["inactive_customers"], 1);
    assert_eq!(body["birthdays_today"], 1);
    assert_eq!(body["inactivity_percent"], 50);
  }

  // ── Campaign ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn targets_carry_rendered_template() {
    let campaign = make_campaign();
    add(&campaign, "Ana", "1990-05-20", "inactive").await;
    add(&campaign, "Bia", "1990-05-20", "active").await;
    add(&campaign, "Caio", "1990-05-21", "inactive").await;

    let (code, body) = call(&campaign, "GET", "/campaign/targets", None).await;
    assert_eq!(code, StatusCode::OK);
    let targets = body.as_array().unwrap();
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0]["customer"]["name"], "Ana");
    assert_eq!(targets[0]["draft"], "Olá Ana! TechStore oferece 20% off.");
    assert_eq!(targets[0]["state"], "draft");
    assert_eq!(targets[0]["generating"], false);
  }

  #[tokio::test]
  async fn non_target_is_404() {
    let campaign = make_campaign();
    let id = add(&campaign, "Bia", "1990-05-20", "active").await;
    let (code, _) = call(&campaign, "GET", &format!("/campaign/targets/{id}"), None).await;
    assert_eq!(code, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn edit_draft_replaces_text() {
    let campaign = make_campaign();
    let id = add(&campaign, "Ana", "1990-05-20", "inactive").await;
    let uri = format!("/campaign/targets/{id}/draft");

    let (code, body) = call(&campaign, "PUT", &uri, Some(json!({ "text": "Oi Ana" }))).await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(body["draft"], "Oi Ana");

    let (code, _) = call(&campaign, "PUT", &uri, Some(json!({ "text": "  " }))).await;
    assert_eq!(code, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn generate_runs_in_background() {
    let campaign = make_campaign();
    let id = add(&campaign, "Ana", "1990-05-20", "inactive").await;

    let (code, _) = call(
      &campaign,
      "POST",
      &format!("/campaign/targets/{id}/generate"),
      Some(json!({ "style": "funny" })),
    )
    .await;
    assert_eq!(code, StatusCode::ACCEPTED);

    let target = wait_for(&campaign, &id, |t| t["generating"] == false).await;
    assert_eq!(target["draft"], "Parabéns, Ana! (funny)");
  }

  #[tokio::test]
  async fn send_delivers_once() {
    let campaign = make_campaign();
    let id = add(&campaign, "Ana", "1990-05-20", "inactive").await;
    let uri = format!("/campaign/targets/{id}/send");

    let (code, body) = call(&campaign, "POST", &uri, None).await;
    assert_eq!(code, StatusCode::ACCEPTED);
    assert_eq!(body["state"], "sending");

    let target = wait_for(&campaign, &id, |t| t["state"] == "sent").await;
    assert_eq!(target["draft"], "Olá Ana! TechStore oferece 20% off.");

    let (code, body) = call(&campaign, "POST", &uri, None).await;
    assert_eq!(code, StatusCode::CONFLICT);
    assert!(body["error"].is_string());

    let (_, customer) = call(&campaign, "GET", &format!("/customers/{id}"), None).await;
    assert_eq!(customer["history"].as_array().unwrap().len(), 1);
  }
}
