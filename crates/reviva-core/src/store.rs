//! The `CustomerStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `reviva-store-memory`).
//! Higher layers (`reviva-campaign`, `reviva-api`) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  config::{CampaignConfig, ConfigPatch},
  customer::{Customer, MessageLog, NewCustomer},
  stats::DashboardStats,
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`CustomerStore::list_customers`].
#[derive(Debug, Clone, Default)]
pub struct CustomerQuery {
  /// Case-insensitive match on the name, or a plain substring of the
  /// contact.
  pub text: Option<String>,
}

impl CustomerQuery {
  pub fn matches(&self, customer: &Customer) -> bool {
    match self.text.as_deref() {
      None | Some("") => true,
      Some(text) => {
        customer.name.to_lowercase().contains(&text.to_lowercase())
          || customer.contact.contains(text)
      }
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// The single authority over customers and the campaign configuration.
///
/// Every mutation goes through one of the methods below. Unknown ids are
/// never errors: deleting or logging against them does nothing.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait CustomerStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Customers ─────────────────────────────────────────────────────────

  /// Append a new customer with a fresh id and empty history. Identical
  /// inputs create distinct customers.
  fn add_customer(
    &self,
    input: NewCustomer,
  ) -> impl Future<Output = Result<Customer, Self::Error>> + Send + '_;

  /// Append several customers at once, in order.
  fn import_customers(
    &self,
    inputs: Vec<NewCustomer>,
  ) -> impl Future<Output = Result<Vec<Customer>, Self::Error>> + Send + '_;

  /// Remove a customer. Returns `false` if there was nothing to remove.
  fn delete_customer(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Retrieve a customer by id. Returns `None` if not found.
  fn get_customer(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Customer>, Self::Error>> + Send + '_;

  /// List customers in insertion order.
  fn list_customers<'a>(
    &'a self,
    query: &'a CustomerQuery,
  ) -> impl Future<Output = Result<Vec<Customer>, Self::Error>> + Send + 'a;

  // ── Message log ───────────────────────────────────────────────────────

  /// Prepend a sent birthday message to the customer's history, timestamped
  /// by the store. Returns `None` (and changes nothing) for an unknown id.
  fn log_message(
    &self,
    customer_id: Uuid,
    content: String,
  ) -> impl Future<Output = Result<Option<MessageLog>, Self::Error>> + Send + '_;

  // ── Configuration ─────────────────────────────────────────────────────

  fn config(
    &self,
  ) -> impl Future<Output = Result<CampaignConfig, Self::Error>> + Send + '_;

  /// Merge `patch` into the current configuration and return the result.
  fn update_config(
    &self,
    patch: ConfigPatch,
  ) -> impl Future<Output = Result<CampaignConfig, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Dashboard figures as of the store's current day.
  fn stats(
    &self,
  ) -> impl Future<Output = Result<DashboardStats, Self::Error>> + Send + '_;
}
