//! Ledger window sizes and rounding.

/// Days covered by the weekly window, including the reference day.
pub const WEEKLY_WINDOW_DAYS: i64 = 7;

/// Days covered by the monthly window, including the reference day.
pub const MONTHLY_WINDOW_DAYS: i64 = 30;

/// Largest CO2 mass (kg) a single ledger entry may carry. Keeps running totals far
/// from the `Decimal` range.
pub const MAX_ENTRY_CO2_KG: i64 = 1_000_000_000;

/// Decimal places kept for aggregated CO2 totals and goal progress.
pub const CO2_DECIMAL_PLACES: u32 = 2;
