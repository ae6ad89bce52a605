//! Wiring for the Reviva server: configuration and application assembly.

use std::{sync::Arc, time::Duration};

use anyhow::Context as _;
use axum::Router;
use reviva_campaign::{Campaign, Composer, GeminiClient, GeminiConfig};
use reviva_core::{
  clock::Clock,
  config::{
    CampaignConfig, DEFAULT_COMPANY_NAME, DEFAULT_LANGUAGE, DEFAULT_OFFER,
    DEFAULT_TEMPLATE,
  },
  demo::demo_customers,
  store::CustomerStore as _,
};
use reviva_store_memory::MemoryStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

/// The campaign type served by this binary.
pub type AppCampaign = Campaign<MemoryStore, GeminiClient>;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `REVIVA_*` environment variables. Every field has a default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  pub company_name:     String,
  pub default_offer:    String,
  pub message_template: String,
  pub language:         String,
  /// Simulated delivery time for each message.
  pub send_delay_ms:    u64,
  /// Without a key, drafts fall back to fixed sentences.
  pub gemini_api_key:   Option<String>,
  pub gemini_model:     Option<String>,
  pub gemini_base_url:  Option<String>,
  /// Load the demo customers at startup.
  pub seed_demo:        bool,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:             "127.0.0.1".into(),
      port:             3000,
      company_name:     DEFAULT_COMPANY_NAME.into(),
      default_offer:    DEFAULT_OFFER.into(),
      message_template: DEFAULT_TEMPLATE.into(),
      language:         DEFAULT_LANGUAGE.into(),
      send_delay_ms:    1500,
      gemini_api_key:   None,
      gemini_model:     None,
      gemini_base_url:  None,
      seed_demo:        false,
    }
  }
}

impl ServerConfig {
  /// Layer an optional TOML file under `REVIVA_*` environment variables.
  pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("REVIVA"))
      .build()
      .context("failed to read config file")?
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// Initial campaign settings.
  pub fn campaign_config(&self) -> CampaignConfig {
    CampaignConfig {
      company_name:     self.company_name.clone(),
      default_offer:    self.default_offer.clone(),
      message_template: self.message_template.clone(),
      language:         self.language.clone(),
    }
  }

  /// Gemini settings, if an API key is configured.
  pub fn gemini(&self) -> Option<GeminiConfig> {
    let key = self.gemini_api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())?;
    let mut gemini = GeminiConfig::new(key);
    if let Some(model) = &self.gemini_model {
      gemini.model = model.clone();
    }
    if let Some(base_url) = &self.gemini_base_url {
      gemini.base_url = base_url.clone();
    }
    Some(gemini)
  }
}

// ─── Assembly ─────────────────────────────────────────────────────────────────

/// Build the store and campaign described by `config`.
pub async fn build_campaign(
  config: &ServerConfig,
  clock: Arc<dyn Clock>,
) -> anyhow::Result<Arc<AppCampaign>> {
  let store = Arc::new(MemoryStore::new(config.campaign_config(), clock.clone()));

  let generator = match config.gemini() {
    Some(gemini) => {
      tracing::info!(model = %gemini.model, "Gemini generation enabled");
      Some(GeminiClient::new(gemini).context("failed to build Gemini client")?)
    }
    None => {
      tracing::warn!("no Gemini API key configured; generated drafts use fallback text");
      None
    }
  };

  if config.seed_demo {
    let seeded = store
      .import_customers(demo_customers(clock.today()))
      .await
      .context("failed to seed demo customers")?;
    tracing::info!(count = seeded.len(), "seeded demo customers");
  }

  Ok(Arc::new(
    Campaign::new(store, Composer::new(generator), clock)
      .with_send_delay(Duration::from_millis(config.send_delay_ms)),
  ))
}

/// The full HTTP application: the API under `/api`, with request tracing.
pub fn app(campaign: Arc<AppCampaign>) -> Router {
  Router::new()
    .nest("/api", reviva_api::api_router(campaign))
    .layer(TraceLayer::new_for_http())
}
