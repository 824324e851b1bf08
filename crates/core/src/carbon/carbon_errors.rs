use thiserror::Error;

/// Errors raised while turning raw activity quantities into ledger entries.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CarbonError {
    #[error("Invalid quantity for '{activity_type}': {reason}")]
    InvalidQuantity {
        activity_type: String,
        reason: String,
    },

    #[error("Unknown activity type: {0}")]
    UnknownActivityType(String),

    #[error("Unknown emission category: {0}")]
    UnknownCategory(String),

    #[error("CO2 total is out of range")]
    TotalOverflow,
}

impl From<CarbonError> for String {
    fn from(error: CarbonError) -> Self {
        error.to_string()
    }
}
