//! Sample customers for demonstrations and manual testing.
//!
//! Not an ingestion path: records are generated relative to `today` so that
//! a fresh store immediately has birthday targets to work with.

use chrono::{Datelike, NaiveDate};

use crate::customer::{CustomerStatus, NewCustomer};

/// Five customers: four share `today`'s month and day (one of them active),
/// one is born on 20 May.
pub fn demo_customers(today: NaiveDate) -> Vec<NewCustomer> {
  let born = |year: i32| born_on(year, today);
  let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or(today);

  vec![
    NewCustomer::new("Roberto Silva", born(1985))
      .with_contact("roberto@email.com")
      .with_last_purchase(date(2023, 1, 15)),
    NewCustomer::new("Ana Souza", born(1990))
      .with_contact("11999998888")
      .with_last_purchase(date(2022, 11, 20)),
    NewCustomer::new("Carlos Oliveira", born(1988))
      .with_contact("carlos@email.com")
      .with_status(CustomerStatus::Active)
      .with_last_purchase(date(2024, 5, 10)),
    NewCustomer::new("Fernanda Lima", date(1995, 5, 20))
      .with_contact("fernanda@email.com")
      .with_last_purchase(date(2023, 3, 1)),
    NewCustomer::new("Bruno Tech", born(1992))
      .with_contact("bruno@tech.com")
      .with_last_purchase(date(2021, 5, 15)),
  ]
}

/// `today`'s month and day in `year`. On 29 February the birth year is
/// moved to the nearest earlier leap year.
fn born_on(year: i32, today: NaiveDate) -> NaiveDate {
  (0..4)
    .find_map(|back| NaiveDate::from_ymd_opt(year - back, today.month(), today.day()))
    .unwrap_or(today)
}
