//! Notifications module - emission with preference and cool-down checks, feed and settings.

mod notification_messages;
mod notifications_model;
mod notifications_service;
mod notifications_traits;


pub use notification_messages::{
    achievement_message, business_alert_message, is_malformed_message, one_day_reminder_message,
    overdue_reminder_message, three_day_reminder_message,
};
pub use notifications_model::{
    EmitOutcome, EmitRequest, NewNotification, Notification, NotificationFeed,
    NotificationSettings, NotificationSettingsUpdate, NotificationType, ReminderBucket,
    SuppressionReason, NOTIFICATION_FEED_LIMIT, REMINDER_COOLDOWN_HOURS,
};
pub use notifications_service::NotificationService;
pub use notifications_traits::{NotificationRepositoryTrait, NotificationServiceTrait};
