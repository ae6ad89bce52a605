//! [`MemoryStore`] — the in-memory implementation of [`CustomerStore`].

use std::{convert::Infallible, sync::Arc};

use tokio::sync::RwLock;
use uuid::Uuid;

use reviva_core::{
  clock::{Clock, SystemClock},
  config::{CampaignConfig, ConfigPatch},
  customer::{Customer, MessageLog, NewCustomer},
  stats::DashboardStats,
  store::{CustomerQuery, CustomerStore},
};

// ─── State ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct State {
  customers: Vec<Customer>,
  config:    CampaignConfig,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Reviva customer store held entirely in memory.
///
/// Cloning is cheap — clones share the same state.
#[derive(Clone)]
pub struct MemoryStore {
  state: Arc<RwLock<State>>,
  clock: Arc<dyn Clock>,
}

impl MemoryStore {
  /// An empty store with the given starting configuration and clock.
  pub fn new(config: CampaignConfig, clock: Arc<dyn Clock>) -> Self {
    Self {
      state: Arc::new(RwLock::new(State { customers: Vec::new(), config })),
      clock,
    }
  }

  /// An empty store with the default configuration on the system clock.
  pub fn with_defaults() -> Self {
    Self::new(CampaignConfig::default(), Arc::new(SystemClock))
  }

  /// The clock used for message timestamps and "today".
  pub fn clock(&self) -> Arc<dyn Clock> { self.clock.clone() }
}

// ─── CustomerStore impl ──────────────────────────────────────────────────────

impl CustomerStore for MemoryStore {
  type Error = Infallible;

  // ── Customers ─────────────────────────────────────────────────────────────

  async fn add_customer(&self, input: NewCustomer) -> Result<Customer, Infallible> {
    let customer = input.into_customer();
    self.state.write().await.customers.push(customer.clone());
    tracing::debug!(customer_id = %customer.id, "customer added");
    Ok(customer)
  }

  async fn import_customers(
    &self,
    inputs: Vec<NewCustomer>,
  ) -> Result<Vec<Customer>, Infallible> {
    let created: Vec<Customer> =
      inputs.into_iter().map(NewCustomer::into_customer).collect();
    self
      .state
      .write()
      .await
      .customers
      .extend(created.iter().cloned());
    tracing::info!(count = created.len(), "customers imported");
    Ok(created)
  }

  async fn delete_customer(&self, id: Uuid) -> Result<bool, Infallible> {
    let mut state = self.state.write().await;
    let before = state.customers.len();
    state.customers.retain(|c| c.id != id);
    let removed = state.customers.len() != before;
    tracing::debug!(customer_id = %id, removed, "delete customer");
    Ok(removed)
  }

  async fn get_customer(&self, id: Uuid) -> Result<Option<Customer>, Infallible> {
    let state = self.state.read().await;
    Ok(state.customers.iter().find(|c| c.id == id).cloned())
  }

  async fn list_customers(
    &self,
    query: &CustomerQuery,
  ) -> Result<Vec<Customer>, Infallible> {
    let state = self.state.read().await;
    Ok(
      state
        .customers
        .iter()
        .filter(|c| query.matches(c))
        .cloned()
        .collect(),
    )
  }

  // ── Message log ───────────────────────────────────────────────────────────

  async fn log_message(
    &self,
    customer_id: Uuid,
    content: String,
  ) -> Result<Option<MessageLog>, Infallible> {
    let mut state = self.state.write().await;
    let Some(customer) = state.customers.iter_mut().find(|c| c.id == customer_id)
    else {
      tracing::debug!(%customer_id, "log_message for unknown customer ignored");
      return Ok(None);
    };

    let log = MessageLog::birthday(content, self.clock.now());
    customer.history.insert(0, log.clone());
    tracing::info!(%customer_id, message_id = %log.id, "birthday message logged");
    Ok(Some(log))
  }

  // ── Configuration ─────────────────────────────────────────────────────────

  async fn config(&self) -> Result<CampaignConfig, Infallible> {
    Ok(self.state.read().await.config.clone())
  }

  async fn update_config(
    &self,
    patch: ConfigPatch,
  ) -> Result<CampaignConfig, Infallible> {
    let mut state = self.state.write().await;
    state.config.apply(patch);
    tracing::info!(company = %state.config.company_name, "campaign config updated");
    Ok(state.config.clone())
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn stats(&self) -> Result<DashboardStats, Infallible> {
    let state = self.state.read().await;
    Ok(DashboardStats::compute(&state.customers, self.clock.today()))
  }
}
