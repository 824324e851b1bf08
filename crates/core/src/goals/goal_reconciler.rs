use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, error, info, warn};

use super::goals_model::{Goal, GoalCategory, NewAchievement, ReconciliationReport};
use super::goals_traits::{AchievementRepositoryTrait, GoalReconcilerTrait, GoalRepositoryTrait};
use crate::carbon::{round_co2, CarbonRepositoryTrait};
use crate::errors::Result;
use crate::notifications::{EmitOutcome, EmitRequest, NotificationServiceTrait};

enum GoalOutcome {
    Unchanged,
    Progressed,
    Completed,
}

/// Recomputes category-linked goal progress from the full ledger history.
///
/// Pending goals complete once the recomputed total reaches the target, and only
/// that pending → completed edge is announced. Completed goals keep their status
/// but still have their progress refreshed, so deletions show up in `current_value`.
pub struct GoalReconciler {
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    achievement_repository: Arc<dyn AchievementRepositoryTrait>,
    carbon_repository: Arc<dyn CarbonRepositoryTrait>,
    notification_service: Arc<dyn NotificationServiceTrait>,
}

impl GoalReconciler {
    pub fn new(
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        achievement_repository: Arc<dyn AchievementRepositoryTrait>,
        carbon_repository: Arc<dyn CarbonRepositoryTrait>,
        notification_service: Arc<dyn NotificationServiceTrait>,
    ) -> Self {
        GoalReconciler {
            goal_repository,
            achievement_repository,
            carbon_repository,
            notification_service,
        }
    }

    async fn reconcile_goal(&self, goal: &Goal, category: GoalCategory) -> Result<GoalOutcome> {
        let total = self.carbon_repository.sum_co2_by_category(
            &goal.user_id,
            category.emission_category(),
            None,
        )?;
        let current_value = round_co2(total);

        if goal.is_pending() && current_value >= goal.target_value {
            return match self
                .goal_repository
                .complete_goal_if_pending(&goal.id, current_value)
                .await?
            {
                Some(completed) => {
                    self.announce_completion(&completed).await;
                    Ok(GoalOutcome::Completed)
                }
                None => {
                    debug!("Goal {} was completed concurrently", goal.id);
                    Ok(GoalOutcome::Progressed)
                }
            };
        }

        if current_value == goal.current_value {
            return Ok(GoalOutcome::Unchanged);
        }

        self.goal_repository
            .update_goal_progress(&goal.id, current_value)
            .await?;
        Ok(GoalOutcome::Progressed)
    }
}

#[async_trait]
impl GoalReconcilerTrait for GoalReconciler {
    async fn reconcile_user_goals(&self, user_id: &str) -> Result<ReconciliationReport> {
        let goals = self.goal_repository.list_category_goals(user_id)?;
        let mut report = ReconciliationReport::default();

        for goal in &goals {
            let Some(category) = goal.category else {
                continue;
            };
            report.goals_evaluated += 1;

            match self.reconcile_goal(goal, category).await {
                Ok(GoalOutcome::Completed) => report.completed_goal_ids.push(goal.id.clone()),
                Ok(GoalOutcome::Progressed) | Ok(GoalOutcome::Unchanged) => {}
                Err(e) => {
                    error!("Failed to reconcile goal {} for user {}: {}", goal.id, user_id, e);
                    report.failed_goal_ids.push(goal.id.clone());
                }
            }
        }

        Ok(report)
    }

    async fn announce_completion(&self, goal: &Goal) {
        let now = Utc::now();
        info!("Goal {} completed for user {}", goal.id, goal.user_id);

        if let Err(e) = self
            .achievement_repository
            .insert_achievement(NewAchievement::for_goal(goal, now.naive_utc()))
            .await
        {
            warn!("Failed to record achievement for goal {}: {}", goal.id, e);
        }

        match self
            .notification_service
            .emit(EmitRequest::achievement(goal), now)
            .await
        {
            Ok(EmitOutcome::Suppressed(reason)) => {
                debug!("Achievement notification for goal {} suppressed: {:?}", goal.id, reason)
            }
            Ok(EmitOutcome::Emitted(_)) => {}
            Err(e) => warn!(
                "Failed to emit achievement notification for goal {}: {}",
                goal.id, e
            ),
        }
    }
}
