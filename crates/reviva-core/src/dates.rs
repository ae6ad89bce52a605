//! Calendar helpers. Birth years are never evaluated.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, de};

use crate::{Error, Result};

/// Does a date of birth fall on `today`'s month and day?
///
/// A 29 February birthday only matches on 29 February.
pub fn is_birthday_on(date_of_birth: NaiveDate, today: NaiveDate) -> bool {
  date_of_birth.month() == today.month() && date_of_birth.day() == today.day()
}

/// Format a date as `DD/MM/YYYY`, or `-` when there is none.
pub fn format_date(date: Option<NaiveDate>) -> String {
  match date {
    Some(d) => d.format("%d/%m/%Y").to_string(),
    None => "-".to_string(),
  }
}

/// Parse a strict `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
  let trimmed = input.trim();
  // `%Y` alone would accept signed and short years.
  let well_formed = trimmed.len() == 10
    && trimmed
      .char_indices()
      .all(|(i, c)| if i == 4 || i == 7 { c == '-' } else { c.is_ascii_digit() });
  if !well_formed {
    return Err(Error::InvalidDate(input.to_string()));
  }
  NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
    .map_err(|_| Error::InvalidDate(input.to_string()))
}

/// Serde adapter running [`parse_date`] on a required date field.
pub fn deserialize_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = String::deserialize(deserializer)?;
  parse_date(&raw).map_err(de::Error::custom)
}

/// Like [`deserialize_date`], for optional fields; `null` and blank strings
/// mean no date.
pub fn deserialize_optional_date<'de, D>(
  deserializer: D,
) -> std::result::Result<Option<NaiveDate>, D::Error>
where
  D: Deserializer<'de>,
{
  match Option::<String>::deserialize(deserializer)? {
    Some(raw) if !raw.trim().is_empty() => parse_date(&raw).map(Some).map_err(de::Error::custom),
    _ => Ok(None),
  }
}
