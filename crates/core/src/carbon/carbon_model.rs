//! Carbon ledger domain models.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::carbon_constants::CO2_DECIMAL_PLACES;
use super::carbon_errors::CarbonError;
use crate::errors::{Result, ValidationError};
use crate::utils::time_utils::ensure_supported_day;

/// Raw activity input for one day, keyed by activity type (e.g. `petrol`, `beef`).
pub type ActivityQuantities = BTreeMap<String, Decimal>;

/// Category tag of a ledger entry. Derived from the activity type, never caller-supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmissionCategory {
    Electricity,
    Transport,
    Flight,
    Fuel,
    Food,
    Waste,
    Other,
}

impl EmissionCategory {
    pub const ALL: [EmissionCategory; 7] = [
        EmissionCategory::Electricity,
        EmissionCategory::Transport,
        EmissionCategory::Flight,
        EmissionCategory::Fuel,
        EmissionCategory::Food,
        EmissionCategory::Waste,
        EmissionCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmissionCategory::Electricity => "electricity",
            EmissionCategory::Transport => "transport",
            EmissionCategory::Flight => "flight",
            EmissionCategory::Fuel => "fuel",
            EmissionCategory::Food => "food",
            EmissionCategory::Waste => "waste",
            EmissionCategory::Other => "other",
        }
    }
}

impl fmt::Display for EmissionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmissionCategory {
    type Err = CarbonError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        EmissionCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| CarbonError::UnknownCategory(s.to_string()))
    }
}

/// A persisted ledger row. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CarbonEntry {
    pub id: String,
    pub user_id: String,
    pub category: EmissionCategory,
    pub activity_type: String,
    pub quantity: Decimal,
    /// Factor in effect when the entry was written.
    pub emission_factor: Decimal,
    pub co2_amount: Decimal,
    pub date: NaiveDate,
    pub created_at: NaiveDateTime,
}

/// A converted activity ready to be appended to the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewCarbonEntry {
    pub user_id: String,
    pub category: EmissionCategory,
    pub activity_type: String,
    pub quantity: Decimal,
    pub emission_factor: Decimal,
    pub co2_amount: Decimal,
    pub date: NaiveDate,
}

/// Inclusive day range `[from, to]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self> {
        ensure_supported_day(from)?;
        ensure_supported_day(to)?;
        if from > to {
            return Err(ValidationError::InvalidInput(format!(
                "Date range start {} is after its end {}",
                from, to
            ))
            .into());
        }
        Ok(Self { from, to })
    }

    pub fn single_day(day: NaiveDate) -> Self {
        Self { from: day, to: day }
    }

    /// The `days`-long window that ends on (and includes) `day`.
    pub fn ending_on(day: NaiveDate, days: i64) -> Result<Self> {
        ensure_supported_day(day)?;
        let span = (days - 1).max(0);
        let from = day
            .checked_sub_signed(Duration::days(span))
            .ok_or_else(|| {
                ValidationError::InvalidInput(format!("No {}-day window ends on {}", days, day))
            })?;
        Ok(Self { from, to: day })
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.from <= day && day <= self.to
    }
}

/// Daily total used by the dashboard series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyCarbonTotal {
    pub date: NaiveDate,
    pub co2_amount: Decimal,
}

/// Dashboard aggregate for one user relative to a reference day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CarbonSummary {
    pub reference_date: NaiveDate,
    pub today: Decimal,
    pub weekly: Decimal,
    pub monthly: Decimal,
    pub by_category: BTreeMap<EmissionCategory, Decimal>,
    pub daily: Vec<DailyCarbonTotal>,
}

/// Rounds an aggregated CO2 mass to two decimals, half away from zero.
pub fn round_co2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CO2_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Adds `amount` to a CO2 total, failing instead of overflowing.
pub fn add_co2(total: Decimal, amount: Decimal) -> Result<Decimal> {
    total
        .checked_add(amount)
        .ok_or_else(|| CarbonError::TotalOverflow.into())
}

/// Sums `co2_amount` over `entries`.
pub fn total_co2<'a>(entries: impl IntoIterator<Item = &'a CarbonEntry>) -> Result<Decimal> {
    entries
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, entry| add_co2(acc, entry.co2_amount))
}
