//! SQLite storage implementation for organizations and their members.
//!
//! Membership is managed outside this application; these tables are only read.

mod model;
mod repository;

pub use model::{OrganizationDB, OrganizationMemberDB};
pub use repository::OrganizationRepository;
