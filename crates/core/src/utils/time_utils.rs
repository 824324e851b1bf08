use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::errors::{Result, ValidationError};

/// Days are stored as `%Y-%m-%d` text, which only sorts correctly for
/// four-digit years.
pub const MIN_SUPPORTED_YEAR: i32 = 1;
pub const MAX_SUPPORTED_YEAR: i32 = 9999;

/// Calendar day of a UTC instant. Ledger days and goal deadlines are UTC days.
pub fn day_of(instant: DateTime<Utc>) -> NaiveDate {
    instant.date_naive()
}

/// Today's UTC calendar day.
pub fn utc_today() -> NaiveDate {
    day_of(Utc::now())
}

pub fn earliest_supported_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(MIN_SUPPORTED_YEAR, 1, 1).unwrap_or(NaiveDate::MIN)
}

pub fn latest_supported_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(MAX_SUPPORTED_YEAR, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// Rejects days outside the years the store can order.
pub fn ensure_supported_day(day: NaiveDate) -> Result<NaiveDate> {
    if (MIN_SUPPORTED_YEAR..=MAX_SUPPORTED_YEAR).contains(&day.year()) {
        return Ok(day);
    }
    Err(ValidationError::InvalidInput(format!(
        "Date {} is outside the supported years {}..={}",
        day, MIN_SUPPORTED_YEAR, MAX_SUPPORTED_YEAR
    ))
    .into())
}

/// Every day in `[start, end]`, in order. Empty when `start > end`.
pub fn get_days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        days.push(current);
        if let Some(next) = current.succ_opt() {
            current = next;
        } else {
            break;
        }
    }
    days
}
