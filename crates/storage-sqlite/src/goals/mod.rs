//! SQLite storage implementation for goals and achievements.

mod model;
mod repository;


pub use model::{AchievementDB, GoalDB};
pub use repository::{AchievementRepository, GoalRepository};
