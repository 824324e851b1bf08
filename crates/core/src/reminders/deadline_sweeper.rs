use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use log::{debug, error, info};
use tokio::sync::Mutex;

use super::reminders_model::{
    classify_deadline, DeadlineStatus, SweepReport, REMINDER_HORIZON_DAYS,
};
use super::reminders_traits::DeadlineSweeperTrait;
use crate::errors::Result;
use crate::goals::{Goal, GoalRepositoryTrait};
use crate::notifications::{
    one_day_reminder_message, overdue_reminder_message, three_day_reminder_message, EmitOutcome,
    EmitRequest, NotificationServiceTrait, ReminderBucket,
};

/// Scans pending goals near or past their deadline and emits reminders.
///
/// Only one sweep runs at a time; a sweep that finds another in flight returns
/// immediately with `skipped_overlapping` set.
pub struct DeadlineSweeper {
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    notification_service: Arc<dyn NotificationServiceTrait>,
    running: Mutex<()>,
}

impl DeadlineSweeper {
    pub fn new(
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        notification_service: Arc<dyn NotificationServiceTrait>,
    ) -> Self {
        DeadlineSweeper {
            goal_repository,
            notification_service,
            running: Mutex::new(()),
        }
    }

    fn reminder_for(goal: &Goal, status: DeadlineStatus) -> EmitRequest {
        let message = match status.bucket {
            ReminderBucket::OneDay => one_day_reminder_message(goal),
            ReminderBucket::ThreeDay => three_day_reminder_message(goal, status.days),
            ReminderBucket::Overdue => overdue_reminder_message(goal, status.days),
        };
        EmitRequest::reminder(goal, status.bucket, message)
    }

    async fn run_sweep(&self, now: DateTime<Utc>) -> Result<SweepReport> {
        let cutoff = now.date_naive() + Duration::days(REMINDER_HORIZON_DAYS);
        let goals = self.goal_repository.list_pending_goals_due_by(cutoff)?;
        let mut report = SweepReport {
            goals_scanned: goals.len(),
            ..Default::default()
        };

        for goal in &goals {
            let Some(status) = classify_deadline(goal.deadline, now) else {
                continue;
            };

            match self
                .notification_service
                .emit(Self::reminder_for(goal, status), now)
                .await
            {
                Ok(EmitOutcome::Emitted(_)) => {
                    debug!("Sent {} reminder for goal {}", status.bucket, goal.id);
                    report.reminders_sent += 1;
                }
                Ok(EmitOutcome::Suppressed(_)) => report.suppressed += 1,
                Err(e) => {
                    error!(
                        "Failed to send {} reminder for goal {}: {}",
                        status.bucket, goal.id, e
                    );
                    report.failures += 1;
                }
            }
        }

        Ok(report)
    }
}

#[async_trait]
impl DeadlineSweeperTrait for DeadlineSweeper {
    async fn sweep(&self, now: DateTime<Utc>) -> Result<SweepReport> {
        let Ok(_guard) = self.running.try_lock() else {
            info!("Deadline sweep already in progress, skipping");
            return Ok(SweepReport {
                skipped_overlapping: true,
                ..Default::default()
            });
        };

        let report = self.run_sweep(now).await?;
        info!(
            "Deadline sweep at {} scanned {} goals: {} sent, {} suppressed, {} failed",
            now.to_rfc3339(),
            report.goals_scanned,
            report.reminders_sent,
            report.suppressed,
            report.failures
        );
        Ok(report)
    }
}
