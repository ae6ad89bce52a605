//! HTTP client for the Gemini `generateContent` endpoint.

use std::time::Duration;

use reviva_core::generator::{GenerationRequest, TextGenerator};
use serde::Deserialize;
use serde_json::json;

use crate::error::GeminiError;

/// Public Gemini REST root.
pub const DEFAULT_BASE_URL: &str =
  "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Connection settings for the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
  pub api_key:  String,
  pub model:    String,
  pub base_url: String,
}

impl GeminiConfig {
  pub fn new(api_key: impl Into<String>) -> Self {
    Self {
      api_key:  api_key.into(),
      model:    DEFAULT_MODEL.to_string(),
      base_url: DEFAULT_BASE_URL.to_string(),
    }
  }
}

/// Async client for Gemini text generation.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct GeminiClient {
  client: reqwest::Client,
  config: GeminiConfig,
}

impl GeminiClient {
  pub fn new(config: GeminiConfig) -> Result<Self, GeminiError> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self { client, config })
  }

  fn url(&self) -> String {
    format!(
      "{}/models/{}:generateContent",
      self.config.base_url.trim_end_matches('/'),
      self.config.model
    )
  }
}

/// The instruction sent to the model.
pub fn prompt(request: &GenerationRequest) -> String {
  format!(
    "Crie uma mensagem curta de aniversário (máximo 250 caracteres) para um \
     cliente chamado \"{name}\".\n\
     O objetivo é reativar este cliente inativo.\n\
     Empresa: {company}\n\
     Oferta: {offer}\n\
     Estilo: {style} (em {language}).\n\
     Não use hashtags. Seja direto mas acolhedor.",
    name = request.customer_name,
    company = request.company_name,
    offer = request.offer,
    style = request.style,
    language = request.language,
  )
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GenerateResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
  content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
  #[serde(default)]
  parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
  text: Option<String>,
}

impl GenerateResponse {
  /// Text parts of the first candidate, concatenated.
  fn into_text(self) -> Option<String> {
    let content = self.candidates.into_iter().next()?.content?;
    let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
    (!text.trim().is_empty()).then_some(text)
  }
}

// ─── TextGenerator impl ──────────────────────────────────────────────────────

impl TextGenerator for GeminiClient {
  type Error = GeminiError;

  async fn generate<'a>(
    &'a self,
    request: &'a GenerationRequest,
  ) -> Result<String, GeminiError> {
    let body = json!({
      "contents": [{ "parts": [{ "text": prompt(request) }] }],
    });

    tracing::debug!(model = %self.config.model, style = %request.style, "requesting generation");
    let resp = self
      .client
      .post(self.url())
      .header("x-goog-api-key", &self.config.api_key)
      .json(&body)
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(GeminiError::Status { status: status.as_u16(), body });
    }

    let parsed: GenerateResponse = resp.json().await?;
    parsed.into_text().ok_or(GeminiError::EmptyResponse)
  }
}
