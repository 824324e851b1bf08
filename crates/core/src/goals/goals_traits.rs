use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::Result;
use crate::goals::goals_model::{
    Achievement, Goal, GoalStatus, NewAchievement, NewGoal, ReconciliationReport,
};

/// Trait for goal repository operations
#[async_trait]
pub trait GoalRepositoryTrait: Send + Sync {
    fn get_goal(&self, goal_id: &str) -> Result<Goal>;
    /// Newest first.
    fn list_goals(&self, user_id: &str) -> Result<Vec<Goal>>;
    /// Every goal of the user with a category link, whatever its status.
    fn list_category_goals(&self, user_id: &str) -> Result<Vec<Goal>>;
    /// Pending goals across all users whose deadline is on or before `cutoff`.
    fn list_pending_goals_due_by(&self, cutoff: NaiveDate) -> Result<Vec<Goal>>;
    async fn insert_goal(&self, user_id: &str, new_goal: NewGoal) -> Result<Goal>;
    /// Writes `current_value` only; status is left untouched.
    async fn update_goal_progress(&self, goal_id: &str, current_value: Decimal) -> Result<Goal>;
    /// Sets `current_value` and flips the goal to completed, but only if it is still pending.
    /// Returns `None` when another writer completed it first.
    async fn complete_goal_if_pending(
        &self,
        goal_id: &str,
        current_value: Decimal,
    ) -> Result<Option<Goal>>;
    async fn set_goal_status(&self, goal_id: &str, status: GoalStatus) -> Result<Goal>;
    async fn delete_goal(&self, goal_id: &str) -> Result<usize>;
}

/// Trait for achievement repository operations
#[async_trait]
pub trait AchievementRepositoryTrait: Send + Sync {
    /// Newest first.
    fn list_achievements(&self, user_id: &str) -> Result<Vec<Achievement>>;
    async fn insert_achievement(&self, new_achievement: NewAchievement) -> Result<Achievement>;
}

/// Keeps category-linked goal progress in step with the carbon ledger.
#[async_trait]
pub trait GoalReconcilerTrait: Send + Sync {
    async fn reconcile_user_goals(&self, user_id: &str) -> Result<ReconciliationReport>;

    /// Records the achievement and notifies the owner. Failures are logged, never returned.
    async fn announce_completion(&self, goal: &Goal);
}

/// Trait for goal service operations
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    fn get_goals(&self, user_id: &str) -> Result<Vec<Goal>>;
    async fn create_goal(&self, user_id: &str, new_goal: NewGoal, today: NaiveDate)
        -> Result<Goal>;
    async fn toggle_goal(&self, user_id: &str, goal_id: &str) -> Result<Goal>;
    async fn set_progress(&self, user_id: &str, goal_id: &str, value: Decimal) -> Result<Goal>;
    async fn delete_goal(&self, user_id: &str, goal_id: &str) -> Result<usize>;
    fn get_achievements(&self, user_id: &str) -> Result<Vec<Achievement>>;
}
