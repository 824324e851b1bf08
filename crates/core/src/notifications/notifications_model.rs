//! Notification domain models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::goals::Goal;

use super::notification_messages::achievement_message;

/// Number of notifications returned by the feed.
pub const NOTIFICATION_FEED_LIMIT: i64 = 50;

/// Window during which a reminder for the same goal and bucket is not repeated.
pub const REMINDER_COOLDOWN_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationType {
    AchievementAlerts,
    GoalReminders,
    BusinessAlerts,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::AchievementAlerts => "achievementAlerts",
            NotificationType::GoalReminders => "goalReminders",
            NotificationType::BusinessAlerts => "businessAlerts",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "achievementAlerts" => Ok(NotificationType::AchievementAlerts),
            "goalReminders" => Ok(NotificationType::GoalReminders),
            "businessAlerts" => Ok(NotificationType::BusinessAlerts),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown notification type: {}",
                other
            ))),
        }
    }
}

/// Deadline window a goal reminder belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReminderBucket {
    #[serde(rename = "3-day")]
    ThreeDay,
    #[serde(rename = "1-day")]
    OneDay,
    #[serde(rename = "overdue")]
    Overdue,
}

impl ReminderBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderBucket::ThreeDay => "3-day",
            ReminderBucket::OneDay => "1-day",
            ReminderBucket::Overdue => "overdue",
        }
    }
}

impl fmt::Display for ReminderBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain model representing a notification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub message: String,
    pub goal_id: Option<String>,
    /// Reminder bucket for goal reminders, `None` otherwise.
    pub dedupe_key: Option<String>,
    pub read: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    pub user_id: String,
    pub notification_type: NotificationType,
    pub message: String,
    pub goal_id: Option<String>,
    pub dedupe_key: Option<String>,
    pub created_at: NaiveDateTime,
}

/// A request to the emitter.
#[derive(Debug, Clone, PartialEq)]
pub struct EmitRequest {
    pub user_id: String,
    pub notification_type: NotificationType,
    pub message: String,
    pub goal_id: Option<String>,
    pub reminder_bucket: Option<ReminderBucket>,
}

impl EmitRequest {
    pub fn achievement(goal: &Goal) -> Self {
        EmitRequest {
            user_id: goal.user_id.clone(),
            notification_type: NotificationType::AchievementAlerts,
            message: achievement_message(&goal.title),
            goal_id: Some(goal.id.clone()),
            reminder_bucket: None,
        }
    }

    pub fn reminder(goal: &Goal, bucket: ReminderBucket, message: String) -> Self {
        EmitRequest {
            user_id: goal.user_id.clone(),
            notification_type: NotificationType::GoalReminders,
            message,
            goal_id: Some(goal.id.clone()),
            reminder_bucket: Some(bucket),
        }
    }

    pub fn business_alert(user_id: &str, message: String) -> Self {
        EmitRequest {
            user_id: user_id.to_string(),
            notification_type: NotificationType::BusinessAlerts,
            message,
            goal_id: None,
            reminder_bucket: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SuppressionReason {
    DisabledByPreference,
    DuplicateWithinWindow,
}

/// Result of an emit call. Suppression is a success, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum EmitOutcome {
    Emitted(Notification),
    Suppressed(SuppressionReason),
}

impl EmitOutcome {
    pub fn is_emitted(&self) -> bool {
        matches!(self, EmitOutcome::Emitted(_))
    }
}

/// Per-user delivery preferences. Every flag defaults to on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub user_id: String,
    pub goal_reminders: bool,
    pub achievement_alerts: bool,
    pub business_alerts: bool,
}

impl NotificationSettings {
    pub fn defaults_for(user_id: &str) -> Self {
        NotificationSettings {
            user_id: user_id.to_string(),
            goal_reminders: true,
            achievement_alerts: true,
            business_alerts: true,
        }
    }

    pub fn allows(&self, notification_type: NotificationType) -> bool {
        match notification_type {
            NotificationType::AchievementAlerts => self.achievement_alerts,
            NotificationType::GoalReminders => self.goal_reminders,
            NotificationType::BusinessAlerts => self.business_alerts,
        }
    }
}

/// Partial settings update; absent flags keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettingsUpdate {
    pub goal_reminders: Option<bool>,
    pub achievement_alerts: Option<bool>,
    pub business_alerts: Option<bool>,
}

impl NotificationSettingsUpdate {
    pub fn apply_to(&self, settings: &mut NotificationSettings) {
        if let Some(value) = self.goal_reminders {
            settings.goal_reminders = value;
        }
        if let Some(value) = self.achievement_alerts {
            settings.achievement_alerts = value;
        }
        if let Some(value) = self.business_alerts {
            settings.business_alerts = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationFeed {
    pub notifications: Vec<Notification>,
    pub settings: NotificationSettings,
}
