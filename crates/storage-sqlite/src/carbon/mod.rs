//! SQLite storage implementation for the carbon ledger.

mod model;
mod repository;


pub use model::{CarbonEntryDB, NewCarbonEntryDB};
pub use repository::CarbonRepository;
