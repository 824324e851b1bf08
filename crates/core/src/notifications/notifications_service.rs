use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info};

use super::notification_messages::is_malformed_message;
use super::notifications_model::{
    EmitOutcome, EmitRequest, NewNotification, NotificationFeed, NotificationSettings,
    NotificationSettingsUpdate, SuppressionReason, NOTIFICATION_FEED_LIMIT,
    REMINDER_COOLDOWN_HOURS,
};
use super::notifications_traits::{NotificationRepositoryTrait, NotificationServiceTrait};
use crate::errors::Result;

pub struct NotificationService {
    notification_repository: Arc<dyn NotificationRepositoryTrait>,
}

impl NotificationService {
    pub fn new(notification_repository: Arc<dyn NotificationRepositoryTrait>) -> Self {
        NotificationService {
            notification_repository,
        }
    }

    /// True when the same goal already got this reminder bucket inside the cool-down window.
    fn is_recent_duplicate(&self, request: &EmitRequest, now: DateTime<Utc>) -> Result<bool> {
        let (Some(goal_id), Some(bucket)) = (&request.goal_id, request.reminder_bucket) else {
            return Ok(false);
        };

        let latest = self.notification_repository.find_latest(
            &request.user_id,
            goal_id,
            request.notification_type,
            bucket.as_str(),
        )?;

        Ok(latest.is_some_and(|previous| {
            now.naive_utc() - previous.created_at < Duration::hours(REMINDER_COOLDOWN_HOURS)
        }))
    }
}

#[async_trait]
impl NotificationServiceTrait for NotificationService {
    async fn emit(&self, request: EmitRequest, now: DateTime<Utc>) -> Result<EmitOutcome> {
        let settings = self.get_settings(&request.user_id).await?;
        if !settings.allows(request.notification_type) {
            debug!(
                "{} notification for user {} disabled by settings",
                request.notification_type, request.user_id
            );
            return Ok(EmitOutcome::Suppressed(
                SuppressionReason::DisabledByPreference,
            ));
        }

        if self.is_recent_duplicate(&request, now)? {
            return Ok(EmitOutcome::Suppressed(
                SuppressionReason::DuplicateWithinWindow,
            ));
        }

        let notification = self
            .notification_repository
            .insert_notification(NewNotification {
                user_id: request.user_id,
                notification_type: request.notification_type,
                message: request.message,
                goal_id: request.goal_id,
                dedupe_key: request.reminder_bucket.map(|b| b.as_str().to_string()),
                created_at: now.naive_utc(),
            })
            .await?;
        Ok(EmitOutcome::Emitted(notification))
    }

    async fn get_feed(&self, user_id: &str) -> Result<NotificationFeed> {
        let notifications = self
            .notification_repository
            .list_notifications(user_id, NOTIFICATION_FEED_LIMIT)?;
        let settings = self.get_settings(user_id).await?;
        Ok(NotificationFeed {
            notifications,
            settings,
        })
    }

    async fn get_settings(&self, user_id: &str) -> Result<NotificationSettings> {
        if let Some(settings) = self.notification_repository.get_settings(user_id)? {
            return Ok(settings);
        }
        self.notification_repository
            .upsert_settings(NotificationSettings::defaults_for(user_id))
            .await
    }

    async fn save_settings(
        &self,
        user_id: &str,
        update: NotificationSettingsUpdate,
    ) -> Result<NotificationSettings> {
        let mut settings = self
            .notification_repository
            .get_settings(user_id)?
            .unwrap_or_else(|| NotificationSettings::defaults_for(user_id));
        update.apply_to(&mut settings);
        self.notification_repository.upsert_settings(settings).await
    }

    async fn mark_all_read(&self, user_id: &str) -> Result<usize> {
        self.notification_repository.mark_all_read(user_id).await
    }

    async fn delete_all(&self, user_id: &str) -> Result<usize> {
        self.notification_repository.delete_all(user_id).await
    }

    async fn cleanup_malformed(&self, user_id: &str) -> Result<usize> {
        let malformed: Vec<String> = self
            .notification_repository
            .list_notifications(user_id, i64::MAX)?
            .into_iter()
            .filter(|n| is_malformed_message(&n.message))
            .map(|n| n.id)
            .collect();

        if malformed.is_empty() {
            return Ok(0);
        }

        let deleted = self
            .notification_repository
            .delete_notifications(user_id, malformed)
            .await?;
        info!("Removed {} malformed notifications for user {}", deleted, user_id);
        Ok(deleted)
    }
}
