use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::Result;
use crate::notifications::notifications_model::{
    EmitOutcome, EmitRequest, NewNotification, Notification, NotificationFeed,
    NotificationSettings, NotificationSettingsUpdate, NotificationType,
};

/// Trait for notification repository operations
#[async_trait]
pub trait NotificationRepositoryTrait: Send + Sync {
    /// Newest first, at most `limit` rows.
    fn list_notifications(&self, user_id: &str, limit: i64) -> Result<Vec<Notification>>;

    /// Most recent notification matching the dedupe tuple.
    fn find_latest(
        &self,
        user_id: &str,
        goal_id: &str,
        notification_type: NotificationType,
        dedupe_key: &str,
    ) -> Result<Option<Notification>>;

    async fn insert_notification(&self, new_notification: NewNotification)
        -> Result<Notification>;

    async fn mark_all_read(&self, user_id: &str) -> Result<usize>;

    async fn delete_all(&self, user_id: &str) -> Result<usize>;

    async fn delete_notifications(&self, user_id: &str, ids: Vec<String>) -> Result<usize>;

    fn get_settings(&self, user_id: &str) -> Result<Option<NotificationSettings>>;

    async fn upsert_settings(&self, settings: NotificationSettings)
        -> Result<NotificationSettings>;
}

/// Trait for notification service operations
#[async_trait]
pub trait NotificationServiceTrait: Send + Sync {
    /// Emits a notification unless the user's settings or the reminder cool-down suppress it.
    async fn emit(&self, request: EmitRequest, now: DateTime<Utc>) -> Result<EmitOutcome>;

    async fn get_feed(&self, user_id: &str) -> Result<NotificationFeed>;

    /// Returns stored settings, creating the defaults on first access.
    async fn get_settings(&self, user_id: &str) -> Result<NotificationSettings>;

    async fn save_settings(
        &self,
        user_id: &str,
        update: NotificationSettingsUpdate,
    ) -> Result<NotificationSettings>;

    async fn mark_all_read(&self, user_id: &str) -> Result<usize>;

    async fn delete_all(&self, user_id: &str) -> Result<usize>;

    async fn cleanup_malformed(&self, user_id: &str) -> Result<usize>;
}
