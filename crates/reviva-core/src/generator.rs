//! The external text-generation capability.
//!
//! Implemented by HTTP clients (e.g. the Gemini client in `reviva-campaign`)
//! and by test doubles. Callers never see its failures directly; the message
//! composer absorbs them into a fallback sentence.

use std::future::Future;

use serde::{Deserialize, Serialize};

/// Requested tone of a generated message.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Style {
  #[default]
  Friendly,
  Formal,
  Funny,
}

/// Everything a generator needs to write one birthday message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
  pub customer_name: String,
  pub company_name:  String,
  pub offer:         String,
  pub style:         Style,
  /// Language the message must be written in.
  pub language:      String,
}

/// Asynchronous text generation.
pub trait TextGenerator: Send + Sync + 'static {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Produce a short (~250 character) message for `request`.
  fn generate<'a>(
    &'a self,
    request: &'a GenerationRequest,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn style_round_trips_through_strings() {
    assert_eq!(Style::Funny.to_string(), "funny");
    assert_eq!("formal".parse::<Style>().unwrap(), Style::Formal);
    assert!("sarcastic".parse::<Style>().is_err());
    let s: Style = serde_json::from_str("\"friendly\"").unwrap();
    assert_eq!(s, Style::Friendly);
  }
}
