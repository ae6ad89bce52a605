//! Error types for `reviva-campaign`.

use thiserror::Error;
use uuid::Uuid;

/// Why a campaign action was refused.
#[derive(Debug, Error)]
pub enum CampaignError {
  #[error("customer {0} is not a birthday target today")]
  NotATarget(Uuid),

  #[error("birthday message already sent to {0} today")]
  AlreadySent(Uuid),

  #[error("customer {0} has a generation or delivery in progress")]
  Busy(Uuid),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl CampaignError {
  pub(crate) fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

/// Failures talking to the Gemini API. Never reach campaign callers; the
/// composer replaces them with fallback text.
#[derive(Debug, Error)]
pub enum GeminiError {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("gemini returned {status}: {body}")]
  Status { status: u16, body: String },

  #[error("gemini returned no text")]
  EmptyResponse,
}

pub type Result<T, E = CampaignError> = std::result::Result<T, E>;
