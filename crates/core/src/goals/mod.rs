//! Goals module - domain models, services, reconciliation, and traits.

mod goal_reconciler;
mod goals_model;
mod goals_service;
mod goals_traits;

#[cfg(test)]
mod goals_service_tests;

pub use goal_reconciler::GoalReconciler;
pub use goals_model::{
    Achievement, Goal, GoalCategory, GoalStatus, NewAchievement, NewGoal, ReconciliationReport,
    MIN_GOAL_TITLE_LEN,
};
pub use goals_service::GoalService;
pub use goals_traits::{
    AchievementRepositoryTrait, GoalReconcilerTrait, GoalRepositoryTrait, GoalServiceTrait,
};
