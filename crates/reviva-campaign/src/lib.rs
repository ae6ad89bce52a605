//! Birthday campaign logic for Reviva.
//!
//! - [`composer`] turns the campaign configuration into message text, either
//!   by template substitution or through a [`TextGenerator`] with a
//!   deterministic fallback.
//! - [`gemini`] is the HTTP client for Google's Gemini API.
//! - [`workflow`] selects today's targets and drives each one through
//!   `Draft → Sending → Sent`.
//!
//! [`TextGenerator`]: reviva_core::generator::TextGenerator

pub mod composer;
pub mod error;
pub mod gemini;
pub mod workflow;


pub use composer::{Composed, Composer};
pub use error::CampaignError;
pub use gemini::{GeminiClient, GeminiConfig};
pub use workflow::{Campaign, DeliveryState, Target};
