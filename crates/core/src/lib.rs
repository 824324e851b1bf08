//! Footprint Core - Domain entities, services, and traits.
//!
//! This crate contains the carbon ledger, goal reconciliation and notification
//! logic. It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod business;
pub mod carbon;
pub mod errors;
pub mod goals;
pub mod notifications;
pub mod reminders;
pub mod utils;

#[cfg(test)]
mod test_support;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
