//! Customer records and the message log each customer owns.
//!
//! A customer's `history` is append-only: entries are prepended by the store
//! when a message is recorded and are never edited or removed afterwards.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dates;

// ─── Status ──────────────────────────────────────────────────────────────────

/// Whether a customer has purchased recently.
///
/// The Portuguese spellings used by older imports are accepted on input.
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
pub enum CustomerStatus {
  #[serde(alias = "ativo")]
  #[strum(to_string = "active", serialize = "ativo")]
  Active,
  #[default]
  #[serde(alias = "inativo")]
  #[strum(to_string = "inactive", serialize = "inativo")]
  Inactive,
}

// ─── Message log ─────────────────────────────────────────────────────────────

/// What a logged message was sent for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
  Birthday,
  Promotional,
}

/// Outcome of a delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
  Sent,
  Failed,
}

/// A message recorded against a customer. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageLog {
  pub id:              Uuid,
  /// Assigned by the store's clock; never accepted from callers.
  pub timestamp:       DateTime<Utc>,
  pub kind:            MessageKind,
  /// The exact text that was sent.
  pub content:         String,
  pub delivery_status: DeliveryStatus,
}

impl MessageLog {
  /// A successfully delivered birthday message.
  pub fn birthday(content: String, timestamp: DateTime<Utc>) -> Self {
    Self {
      id: Uuid::new_v4(),
      timestamp,
      kind: MessageKind::Birthday,
      content,
      delivery_status: DeliveryStatus::Sent,
    }
  }

  /// True if this is a birthday message logged on `day` (UTC).
  pub fn is_birthday_on(&self, day: NaiveDate) -> bool {
    self.kind == MessageKind::Birthday && self.timestamp.date_naive() == day
  }
}

// ─── Customer ────────────────────────────────────────────────────────────────

/// A customer tracked by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
  pub id:                 Uuid,
  pub name:               String,
  /// Only the month and day are ever compared.
  pub date_of_birth:      NaiveDate,
  /// Email address or phone number, free-form.
  pub contact:            String,
  pub status:             CustomerStatus,
  pub last_purchase_date: Option<NaiveDate>,
  /// Most recent first.
  pub history:            Vec<MessageLog>,
}

impl Customer {
  pub fn is_inactive(&self) -> bool { self.status == CustomerStatus::Inactive }

  /// Birthday today, regardless of status.
  pub fn has_birthday_on(&self, today: NaiveDate) -> bool {
    dates::is_birthday_on(self.date_of_birth, today)
  }

  /// Whether a birthday message has already gone out on `today`.
  pub fn received_birthday_message_on(&self, today: NaiveDate) -> bool {
    self.history.iter().any(|log| log.is_birthday_on(today))
  }
}

// ─── NewCustomer ─────────────────────────────────────────────────────────────

/// Input to [`crate::store::CustomerStore::add_customer`].
/// `id` and `history` are always set by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
  pub name:               String,
  #[serde(deserialize_with = "dates::deserialize_date")]
  pub date_of_birth:      NaiveDate,
  #[serde(default)]
  pub contact:            String,
  #[serde(default)]
  pub status:             CustomerStatus,
  #[serde(default, deserialize_with = "dates::deserialize_optional_date")]
  pub last_purchase_date: Option<NaiveDate>,
}

impl NewCustomer {
  /// Convenience constructor; status defaults to inactive, no contact.
  pub fn new(name: impl Into<String>, date_of_birth: NaiveDate) -> Self {
    Self {
      name: name.into(),
      date_of_birth,
      contact: String::new(),
      status: CustomerStatus::default(),
      last_purchase_date: None,
    }
  }

  pub fn with_status(mut self, status: CustomerStatus) -> Self {
    self.status = status;
    self
  }

  pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
    self.contact = contact.into();
    self
  }

  pub fn with_last_purchase(mut self, date: NaiveDate) -> Self {
    self.last_purchase_date = Some(date);
    self
  }

  /// Materialise into a [`Customer`] with a fresh id and empty history.
  pub fn into_customer(self) -> Customer {
    Customer {
      id:                 Uuid::new_v4(),
      name:               self.name,
      date_of_birth:      self.date_of_birth,
      contact:            self.contact,
      status:             self.status,
      last_purchase_date: self.last_purchase_date,
      history:            Vec::new(),
    }
  }
}
