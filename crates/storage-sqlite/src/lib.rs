//! SQLite storage implementation for Footprint.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `footprint-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for the carbon ledger, goals, notifications and organizations
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! The core crate is database-agnostic and works with traits.
//!
//! ```text
//!     core (domain)          server (HTTP + scheduler)
//!           │                        │
//!           └───────────┬────────────┘
//!                       │
//!                       ▼
//!           storage-sqlite (this crate)
//!                       │
//!                       ▼
//!                   SQLite DB
//! ```
//!
//! Reads go through the connection pool. Every write goes through the single
//! [`WriteHandle`] actor, which runs each job inside an immediate transaction.

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod carbon;
pub mod goals;
pub mod notifications;
pub mod organizations;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from footprint-core for convenience
pub use footprint_core::errors::{DatabaseError, Error, Result};

pub use carbon::CarbonRepository;
pub use goals::{AchievementRepository, GoalRepository};
pub use notifications::NotificationRepository;
pub use organizations::OrganizationRepository;

/// Parses a TEXT column holding a decimal, falling back to zero for garbage.
pub(crate) fn parse_decimal_column(value: &str, column: &str) -> rust_decimal::Decimal {
    use std::str::FromStr;
    rust_decimal::Decimal::from_str(value.trim()).unwrap_or_else(|e| {
        log::error!("Failed to parse {} '{}': {}", column, value, e);
        rust_decimal::Decimal::ZERO
    })
}

/// Parses a `%Y-%m-%d` TEXT column, falling back to the epoch date for garbage.
pub(crate) fn parse_date_column(value: &str, column: &str) -> chrono::NaiveDate {
    chrono::NaiveDate::parse_from_str(value, DATE_FORMAT).unwrap_or_else(|e| {
        log::error!("Failed to parse {} '{}': {}", column, value, e);
        chrono::NaiveDate::default()
    })
}

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

#[cfg(test)]
pub(crate) mod test_db;
