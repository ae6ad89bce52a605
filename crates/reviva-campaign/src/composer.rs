//! Message composition.
//!
//! Two paths produce the text recorded for a target: [`render_template`]
//! (deterministic, used for every fresh draft) and [`Composer::compose`]
//! (asks a [`TextGenerator`] and falls back to a fixed sentence when there is
//! no generator or it fails). Neither ever returns an error; a composed
//! result says whether it is a fallback.

use reviva_core::{
  config::{
    CampaignConfig, OFFER_WINDOW, TOKEN_COMPANY, TOKEN_DATE, TOKEN_NAME,
    TOKEN_OFFER,
  },
  generator::{GenerationRequest, Style, TextGenerator},
};

/// Fill the configured template for one customer.
///
/// Tokens are replaced in order (name, company, offer, date), first
/// occurrence only. Anything left over stays in the text verbatim.
pub fn render_template(config: &CampaignConfig, customer_name: &str) -> String {
  config
    .message_template
    .replacen(TOKEN_NAME, customer_name, 1)
    .replacen(TOKEN_COMPANY, &config.company_name, 1)
    .replacen(TOKEN_OFFER, &config.default_offer, 1)
    .replacen(TOKEN_DATE, OFFER_WINDOW, 1)
}

/// Build a generation request for `customer_name` from the current config.
pub fn request_for(
  config: &CampaignConfig,
  customer_name: &str,
  style: Style,
) -> GenerationRequest {
  GenerationRequest {
    customer_name: customer_name.to_string(),
    company_name:  config.company_name.clone(),
    offer:         config.default_offer.clone(),
    style,
    language:      config.language.clone(),
  }
}

/// Used when no generator is configured.
pub fn unconfigured_fallback(request: &GenerationRequest) -> String {
  format!(
    "Olá {}, feliz aniversário! A {} tem um presente para você: {}.",
    request.customer_name, request.company_name, request.offer
  )
}

/// Used when the generator fails or answers with nothing.
pub fn failure_fallback(request: &GenerationRequest) -> String {
  format!(
    "Olá {}, parabéns! A {} preparou: {} para você hoje.",
    request.customer_name, request.company_name, request.offer
  )
}

/// Text returned by [`Composer::compose`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composed {
  pub text:     String,
  /// `true` when `text` is a fallback sentence rather than generator output.
  pub fallback: bool,
}

impl Composed {
  fn generated(text: &str) -> Self {
    Self { text: text.trim().to_string(), fallback: false }
  }

  fn fallback(text: String) -> Self { Self { text, fallback: true } }
}

/// Produces generated message text, absorbing every generator failure.
#[derive(Debug, Clone)]
pub struct Composer<G> {
  generator: Option<G>,
}

impl<G: TextGenerator> Composer<G> {
  pub fn new(generator: Option<G>) -> Self { Self { generator } }

  pub fn with_generator(generator: G) -> Self { Self::new(Some(generator)) }

  pub fn has_generator(&self) -> bool { self.generator.is_some() }

  /// Always returns usable text.
  pub async fn compose(&self, request: &GenerationRequest) -> Composed {
    let Some(generator) = &self.generator else {
      tracing::warn!("no text generator configured; using fallback message");
      return Composed::fallback(unconfigured_fallback(request));
    };

    match generator.generate(request).await {
      Ok(text) if !text.trim().is_empty() => Composed::generated(&text),
      Ok(_) => {
        tracing::warn!(style = %request.style, "generator returned empty text");
        Composed::fallback(failure_fallback(request))
      }
      Err(e) => {
        tracing::warn!(error = %e, style = %request.style, "generation failed");
        Composed::fallback(failure_fallback(request))
      }
    }
  }
}
