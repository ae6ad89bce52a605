//! Target selection and the per-target `Draft → Sending → Sent` state
//! machine.
//!
//! Targets are recomputed from the store on every call to
//! [`Campaign::targets`]; the only state the campaign keeps is a map from
//! customer id to that customer's draft override and pending flags. Each
//! entry is independent, so one customer's generation or delivery never
//! touches another's.
//!
//! Lock order is always drafts map first, then store. The drafts lock is
//! never held across a generator call or the delivery delay.

use std::{collections::HashMap, sync::Arc, time::Duration};

use chrono::NaiveDate;
use reviva_core::{
  clock::Clock,
  config::CampaignConfig,
  customer::{Customer, MessageLog},
  generator::{GenerationRequest, Style, TextGenerator},
  store::{CustomerQuery, CustomerStore},
};
use serde::Serialize;
use tokio::{sync::Mutex, task::JoinHandle};
use uuid::Uuid;

use crate::{
  composer::{Composed, Composer, render_template, request_for},
  error::{CampaignError, Result},
};

/// How long a simulated delivery takes.
pub const DEFAULT_SEND_DELAY: Duration = Duration::from_millis(1500);

// ─── Selection ───────────────────────────────────────────────────────────────

/// Inactive customers whose birthday is `today`. History is not consulted.
pub fn select_targets(customers: &[Customer], today: NaiveDate) -> Vec<&Customer> {
  customers.iter().filter(|c| is_target(c, today)).collect()
}

fn is_target(customer: &Customer, today: NaiveDate) -> bool {
  customer.is_inactive() && customer.has_birthday_on(today)
}

// ─── Views ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryState {
  /// Editable; may be regenerated or sent.
  Draft,
  /// Delivery in progress; the draft is read-only.
  Sending,
  /// A birthday message was logged today. Terminal until tomorrow.
  Sent,
}

/// One of today's targets as presented to the operator.
#[derive(Debug, Clone, Serialize)]
pub struct Target {
  pub customer:   Customer,
  /// The text that would be sent right now, or what was sent today.
  pub draft:      String,
  pub state:      DeliveryState,
  /// A generated variant is being prepared for this customer.
  pub generating: bool,
}

#[derive(Debug)]
struct DraftEntry {
  /// The day this entry belongs to. Text from any other day is ignored.
  day:        NaiveDate,
  /// Operator edit or generated variant replacing the template draft.
  text:       Option<String>,
  generating: bool,
  sending:    bool,
}

impl DraftEntry {
  fn new(day: NaiveDate) -> Self {
    Self { day, text: None, generating: false, sending: false }
  }

  fn is_pending(&self) -> bool { self.generating || self.sending }

  /// The override text, if it was made for `today`.
  fn text_for(&self, today: NaiveDate) -> Option<&str> {
    self.text.as_deref().filter(|_| self.day == today)
  }
}

/// The entry for `id` on `today`, replacing an idle entry left from an
/// earlier day.
fn current_entry(
  drafts: &mut HashMap<Uuid, DraftEntry>,
  id: Uuid,
  today: NaiveDate,
) -> &mut DraftEntry {
  let entry = drafts.entry(id).or_insert_with(|| DraftEntry::new(today));
  if entry.day != today && !entry.is_pending() {
    tracing::debug!(customer_id = %id, day = %entry.day, "discarding stale draft");
    *entry = DraftEntry::new(today);
  }
  entry
}

// ─── Campaign ────────────────────────────────────────────────────────────────

/// Today's birthday outreach over a [`CustomerStore`].
pub struct Campaign<S, G> {
  store:      Arc<S>,
  composer:   Composer<G>,
  clock:      Arc<dyn Clock>,
  send_delay: Duration,
  drafts:     Mutex<HashMap<Uuid, DraftEntry>>,
}

impl<S, G> Campaign<S, G>
where
  S: CustomerStore,
  G: TextGenerator,
{
  pub fn new(store: Arc<S>, composer: Composer<G>, clock: Arc<dyn Clock>) -> Self {
    Self {
      store,
      composer,
      clock,
      send_delay: DEFAULT_SEND_DELAY,
      drafts: Mutex::new(HashMap::new()),
    }
  }

  pub fn with_send_delay(mut self, delay: Duration) -> Self {
    self.send_delay = delay;
    self
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  /// The campaign's notion of today.
  pub fn today(&self) -> NaiveDate { self.clock.today() }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// Today's targets with their current drafts and states.
  ///
  /// Draft overrides belonging to customers who are no longer targets are
  /// dropped here.
  pub async fn targets(&self) -> Result<Vec<Target>> {
    let mut drafts = self.drafts.lock().await;
    let customers = self
      .store
      .list_customers(&CustomerQuery::default())
      .await
      .map_err(CampaignError::store)?;
    let config = self.store.config().await.map_err(CampaignError::store)?;
    let today = self.clock.today();

    let targets = select_targets(&customers, today);
    drafts.retain(|id, entry| {
      entry.is_pending() || (entry.day == today && targets.iter().any(|c| c.id == *id))
    });

    Ok(
      targets
        .into_iter()
        .map(|customer| build_target(customer, drafts.get(&customer.id), &config, today))
        .collect(),
    )
  }

  /// A single target, or [`CampaignError::NotATarget`].
  pub async fn target(&self, id: Uuid) -> Result<Target> {
    let drafts = self.drafts.lock().await;
    let (customer, config) = self.load_target(id).await?;
    Ok(build_target(&customer, drafts.get(&id), &config, self.clock.today()))
  }

  // ── Draft editing ─────────────────────────────────────────────────────────

  /// Replace the draft with operator-written text.
  pub async fn edit_draft(&self, id: Uuid, text: String) -> Result<Target> {
    let mut drafts = self.drafts.lock().await;
    let (customer, config) = self.load_editable(id).await?;
    let today = self.clock.today();
    let entry = current_entry(&mut drafts, id, today);
    if entry.is_pending() {
      return Err(CampaignError::Busy(id));
    }
    entry.text = Some(text);
    tracing::debug!(customer_id = %id, "draft edited");
    Ok(build_target(&customer, Some(&*entry), &config, today))
  }

  // ── Generation ────────────────────────────────────────────────────────────

  /// Generate a new draft in `style` and wait for it.
  ///
  /// A fallback result leaves the current draft untouched.
  pub async fn generate(&self, id: Uuid, style: Style) -> Result<Composed> {
    let request = self.begin_generation(id, style).await?;
    Ok(self.finish_generation(id, request).await)
  }

  /// Mark the customer as generating, then finish in the background.
  pub async fn start_generation(
    self: &Arc<Self>,
    id: Uuid,
    style: Style,
  ) -> Result<JoinHandle<Composed>>
  where
    S: 'static,
  {
    let request = self.begin_generation(id, style).await?;
    let campaign = Arc::clone(self);
    Ok(tokio::spawn(async move { campaign.finish_generation(id, request).await }))
  }

  async fn begin_generation(&self, id: Uuid, style: Style) -> Result<GenerationRequest> {
    let mut drafts = self.drafts.lock().await;
    let (customer, config) = self.load_editable(id).await?;
    let today = self.clock.today();
    let entry = current_entry(&mut drafts, id, today);
    if entry.is_pending() {
      return Err(CampaignError::Busy(id));
    }
    entry.generating = true;
    tracing::info!(customer_id = %id, %style, "generating message");
    Ok(request_for(&config, &customer.name, style))
  }

  async fn finish_generation(&self, id: Uuid, request: GenerationRequest) -> Composed {
    let composed = self.composer.compose(&request).await;

    let mut drafts = self.drafts.lock().await;
    if let Some(entry) = drafts.get_mut(&id) {
      entry.generating = false;
      if composed.fallback {
        tracing::info!(customer_id = %id, "no generated variant; draft kept");
      } else {
        entry.text = Some(composed.text.clone());
        tracing::debug!(customer_id = %id, "generated draft stored");
      }
    }
    composed
  }

  // ── Delivery ──────────────────────────────────────────────────────────────

  /// Send the current draft and wait for delivery to complete.
  ///
  /// Returns the logged message, or `None` if the customer was deleted
  /// while the delivery was in flight.
  pub async fn send(&self, id: Uuid) -> Result<Option<MessageLog>> {
    let content = self.begin_send(id).await?;
    self.finish_send(id, content).await
  }

  /// Enter `Sending`, then deliver in the background.
  pub async fn start_send(
    self: &Arc<Self>,
    id: Uuid,
  ) -> Result<JoinHandle<Result<Option<MessageLog>>>>
  where
    S: 'static,
  {
    let content = self.begin_send(id).await?;
    let campaign = Arc::clone(self);
    Ok(tokio::spawn(async move { campaign.finish_send(id, content).await }))
  }

  async fn begin_send(&self, id: Uuid) -> Result<String> {
    let mut drafts = self.drafts.lock().await;
    let (customer, config) = self.load_editable(id).await?;
    let today = self.clock.today();
    let entry = current_entry(&mut drafts, id, today);
    if entry.is_pending() {
      return Err(CampaignError::Busy(id));
    }
    entry.sending = true;
    tracing::info!(customer_id = %id, "sending birthday message");
    Ok(
      entry
        .text
        .clone()
        .unwrap_or_else(|| render_template(&config, &customer.name)),
    )
  }

  async fn finish_send(&self, id: Uuid, content: String) -> Result<Option<MessageLog>> {
    tokio::time::sleep(self.send_delay).await;

    let logged = self.store.log_message(id, content).await;
    // Sent is read back from history from here on.
    self.drafts.lock().await.remove(&id);

    let logged = logged.map_err(|e| {
      tracing::error!(customer_id = %id, error = %e, "failed to record sent message");
      CampaignError::store(e)
    })?;
    match &logged {
      Some(log) => tracing::info!(customer_id = %id, message_id = %log.id, "birthday message sent"),
      None => tracing::warn!(customer_id = %id, "customer removed before delivery completed"),
    }
    Ok(logged)
  }

  // ── Helpers ───────────────────────────────────────────────────────────────

  async fn load_target(&self, id: Uuid) -> Result<(Customer, CampaignConfig)> {
    let customer = self
      .store
      .get_customer(id)
      .await
      .map_err(CampaignError::store)?
      .filter(|c| is_target(c, self.clock.today()))
      .ok_or(CampaignError::NotATarget(id))?;
    let config = self.store.config().await.map_err(CampaignError::store)?;
    Ok((customer, config))
  }

  /// Like [`Self::load_target`], but refuses targets already sent today.
  async fn load_editable(&self, id: Uuid) -> Result<(Customer, CampaignConfig)> {
    let (customer, config) = self.load_target(id).await?;
    if customer.received_birthday_message_on(self.clock.today()) {
      return Err(CampaignError::AlreadySent(id));
    }
    Ok((customer, config))
  }
}

fn build_target(
  customer: &Customer,
  entry: Option<&DraftEntry>,
  config: &CampaignConfig,
  today: NaiveDate,
) -> Target {
  let sent_today = customer.history.iter().find(|log| log.is_birthday_on(today));

  let state = if sent_today.is_some() {
    DeliveryState::Sent
  } else if entry.is_some_and(|e| e.sending) {
    DeliveryState::Sending
  } else {
    DeliveryState::Draft
  };

  let draft = match sent_today {
    Some(log) => log.content.clone(),
    None => entry
      .and_then(|e| e.text_for(today))
      .map_or_else(|| render_template(config, &customer.name), str::to_string),
  };

  Target {
    customer: customer.clone(),
    draft,
    state,
    generating: entry.is_some_and(|e| e.generating),
  }
}
