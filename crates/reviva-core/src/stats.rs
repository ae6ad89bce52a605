//! Dashboard figures computed from a snapshot of the customer list.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::customer::Customer;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
  pub total_customers:     usize,
  pub active_customers:    usize,
  pub inactive_customers:  usize,
  /// Birthdays today regardless of status.
  pub birthdays_today:     usize,
  /// Every logged message across every customer.
  pub messages_sent_total: usize,
  /// Share of inactive customers, rounded; 0 for an empty store.
  pub inactivity_percent:  u8,
}

impl DashboardStats {
  pub fn compute(customers: &[Customer], today: NaiveDate) -> Self {
    let total_customers = customers.len();
    let inactive_customers = customers.iter().filter(|c| c.is_inactive()).count();
    let birthdays_today =
      customers.iter().filter(|c| c.has_birthday_on(today)).count();
    let messages_sent_total = customers.iter().map(|c| c.history.len()).sum();

    let inactivity_percent = if total_customers == 0 {
      0
    } else {
      ((inactive_customers as f64 / total_customers as f64) * 100.0).round()
        as u8
    };

    Self {
      total_customers,
      active_customers: total_customers - inactive_customers,
      inactive_customers,
      birthdays_today,
      messages_sent_total,
      inactivity_percent,
    }
  }
}
