use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::carbon::carbon_model::{
    ActivityQuantities, CarbonEntry, CarbonSummary, DateRange, EmissionCategory, NewCarbonEntry,
};
use crate::errors::Result;

/// Trait for carbon ledger repository operations
#[async_trait]
pub trait CarbonRepositoryTrait: Send + Sync {
    /// Appends all entries in a single transaction; either every row is written or none is.
    async fn append_entries(&self, entries: Vec<NewCarbonEntry>) -> Result<Vec<CarbonEntry>>;

    /// Entries with `date` inside `range` (inclusive), oldest day first. `None` returns all history.
    fn list_entries(&self, user_id: &str, range: Option<DateRange>) -> Result<Vec<CarbonEntry>>;

    fn sum_co2_by_category(
        &self,
        user_id: &str,
        category: EmissionCategory,
        range: Option<DateRange>,
    ) -> Result<Decimal>;

    async fn delete_entries_for_day(&self, user_id: &str, day: NaiveDate) -> Result<usize>;
}

/// Trait for carbon ledger service operations
#[async_trait]
pub trait CarbonServiceTrait: Send + Sync {
    async fn record_activities(
        &self,
        user_id: &str,
        day: NaiveDate,
        activities: &ActivityQuantities,
    ) -> Result<Vec<CarbonEntry>>;

    fn list_entries(&self, user_id: &str, range: Option<DateRange>) -> Result<Vec<CarbonEntry>>;

    fn aggregate_by_category(
        &self,
        user_id: &str,
        category: EmissionCategory,
        range: Option<DateRange>,
    ) -> Result<Decimal>;

    async fn delete_entries_for_day(&self, user_id: &str, day: NaiveDate) -> Result<usize>;

    fn get_summary(&self, user_id: &str, day: NaiveDate) -> Result<CarbonSummary>;
}
