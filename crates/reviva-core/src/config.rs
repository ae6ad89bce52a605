//! Campaign configuration: the operator-editable settings that feed message
//! templates and generation prompts.

use serde::{Deserialize, Serialize};

/// Substituted with the customer's name.
pub const TOKEN_NAME: &str = "[NOME]";
/// Substituted with [`CampaignConfig::company_name`].
pub const TOKEN_COMPANY: &str = "[EMPRESA]";
/// Substituted with [`CampaignConfig::default_offer`].
pub const TOKEN_OFFER: &str = "[OFERTA ESPECIAL]";
/// Substituted with [`OFFER_WINDOW`].
pub const TOKEN_DATE: &str = "[DATA]";

/// The fixed validity window rendered in place of [`TOKEN_DATE`].
pub const OFFER_WINDOW: &str = "7 dias";

pub const DEFAULT_COMPANY_NAME: &str = "TechStore";
pub const DEFAULT_OFFER: &str = "20% de desconto em toda a loja";
pub const DEFAULT_TEMPLATE: &str = "Olá [NOME]! 🎉 Feliz aniversário! A equipe \
                                    [EMPRESA] deseja um dia especial. Como \
                                    presente, preparamos [OFERTA ESPECIAL]. \
                                    Estamos com saudades!";
pub const DEFAULT_LANGUAGE: &str = "Português do Brasil";

/// Process-wide campaign settings. No validation is applied: a template
/// without any placeholder is perfectly acceptable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignConfig {
  pub company_name:     String,
  pub default_offer:    String,
  pub message_template: String,
  /// Language requested from the text generator.
  pub language:         String,
}

impl Default for CampaignConfig {
  fn default() -> Self {
    Self {
      company_name:     DEFAULT_COMPANY_NAME.to_string(),
      default_offer:    DEFAULT_OFFER.to_string(),
      message_template: DEFAULT_TEMPLATE.to_string(),
      language:         DEFAULT_LANGUAGE.to_string(),
    }
  }
}

/// A partial update; `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigPatch {
  pub company_name:     Option<String>,
  pub default_offer:    Option<String>,
  pub message_template: Option<String>,
  pub language:         Option<String>,
}

impl CampaignConfig {
  /// Merge `patch` into `self`.
  pub fn apply(&mut self, patch: ConfigPatch) {
    if let Some(v) = patch.company_name {
      self.company_name = v;
    }
    if let Some(v) = patch.default_offer {
      self.default_offer = v;
    }
    if let Some(v) = patch.message_template {
      self.message_template = v;
    }
    if let Some(v) = patch.language {
      self.language = v;
    }
  }
}
