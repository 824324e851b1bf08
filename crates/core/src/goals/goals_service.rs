use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;

use super::goals_model::{Achievement, Goal, NewGoal};
use super::goals_traits::{
    AchievementRepositoryTrait, GoalReconcilerTrait, GoalRepositoryTrait, GoalServiceTrait,
};
use crate::errors::{Error, Result, ValidationError};

pub struct GoalService {
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    achievement_repository: Arc<dyn AchievementRepositoryTrait>,
    goal_reconciler: Arc<dyn GoalReconcilerTrait>,
}

impl GoalService {
    pub fn new(
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        achievement_repository: Arc<dyn AchievementRepositoryTrait>,
        goal_reconciler: Arc<dyn GoalReconcilerTrait>,
    ) -> Self {
        GoalService {
            goal_repository,
            achievement_repository,
            goal_reconciler,
        }
    }

    /// Loads a goal and checks that `user_id` owns it.
    fn load_owned_goal(&self, user_id: &str, goal_id: &str) -> Result<Goal> {
        let goal = self.goal_repository.get_goal(goal_id).map_err(|e| {
            if e.is_not_found() {
                Error::NotFound(format!("Goal {} not found", goal_id))
            } else {
                e
            }
        })?;
        if goal.user_id != user_id {
            return Err(Error::Forbidden(format!(
                "Goal {} does not belong to the current user",
                goal_id
            )));
        }
        Ok(goal)
    }
}

#[async_trait]
impl GoalServiceTrait for GoalService {
    fn get_goals(&self, user_id: &str) -> Result<Vec<Goal>> {
        self.goal_repository.list_goals(user_id)
    }

    async fn create_goal(
        &self,
        user_id: &str,
        new_goal: NewGoal,
        today: NaiveDate,
    ) -> Result<Goal> {
        new_goal.validate(today)?;
        let goal = self.goal_repository.insert_goal(user_id, new_goal).await?;

        if !goal.is_category_linked() {
            return Ok(goal);
        }

        // Category-linked goals start from the ledger, not from caller input.
        match self.goal_reconciler.reconcile_user_goals(user_id).await {
            Ok(report) => debug!(
                "Reconciled {} goals after creating goal {}",
                report.goals_evaluated, goal.id
            ),
            Err(e) => {
                warn!("Reconciliation after creating goal {} failed: {}", goal.id, e);
                return Ok(goal);
            }
        }
        self.goal_repository.get_goal(&goal.id)
    }

    async fn toggle_goal(&self, user_id: &str, goal_id: &str) -> Result<Goal> {
        let goal = self.load_owned_goal(user_id, goal_id)?;
        self.goal_repository
            .set_goal_status(goal_id, goal.status.toggled())
            .await
    }

    async fn set_progress(&self, user_id: &str, goal_id: &str, value: Decimal) -> Result<Goal> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(ValidationError::InvalidInput(
                "Progress value cannot be negative".to_string(),
            )
            .into());
        }

        let goal = self.load_owned_goal(user_id, goal_id)?;
        if goal.is_category_linked() {
            return Err(ValidationError::InvalidInput(format!(
                "Goal {} tracks the carbon ledger; its progress cannot be set manually",
                goal_id
            ))
            .into());
        }

        if goal.is_pending() && value >= goal.target_value {
            if let Some(completed) = self
                .goal_repository
                .complete_goal_if_pending(goal_id, value)
                .await?
            {
                self.goal_reconciler.announce_completion(&completed).await;
                return Ok(completed);
            }
        }

        self.goal_repository
            .update_goal_progress(goal_id, value)
            .await
    }

    async fn delete_goal(&self, user_id: &str, goal_id: &str) -> Result<usize> {
        self.load_owned_goal(user_id, goal_id)?;
        self.goal_repository.delete_goal(goal_id).await
    }

    fn get_achievements(&self, user_id: &str) -> Result<Vec<Achievement>> {
        self.achievement_repository.list_achievements(user_id)
    }
}
