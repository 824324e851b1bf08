//! Database models for notifications.

use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use footprint_core::errors::ValidationError;
use footprint_core::notifications::{
    NewNotification, Notification, NotificationSettings, NotificationType,
};
use serde::{Deserialize, Serialize};

#[derive(
    Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::notifications)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct NotificationDB {
    pub id: String,
    pub user_id: String,
    pub notification_type: String,
    pub message: String,
    pub goal_id: Option<String>,
    pub dedupe_key: Option<String>,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::notifications)]
pub struct NewNotificationDB {
    pub id: String,
    pub user_id: String,
    pub notification_type: String,
    pub message: String,
    pub goal_id: Option<String>,
    pub dedupe_key: Option<String>,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

impl NewNotificationDB {
    pub fn from_domain(id: String, new_notification: NewNotification) -> Self {
        Self {
            id,
            user_id: new_notification.user_id,
            notification_type: new_notification.notification_type.as_str().to_string(),
            message: new_notification.message,
            goal_id: new_notification.goal_id,
            dedupe_key: new_notification.dedupe_key,
            is_read: false,
            created_at: new_notification.created_at,
        }
    }
}

impl TryFrom<NotificationDB> for Notification {
    type Error = ValidationError;

    fn try_from(db: NotificationDB) -> Result<Self, Self::Error> {
        Ok(Self {
            notification_type: NotificationType::from_str(&db.notification_type)?,
            id: db.id,
            user_id: db.user_id,
            message: db.message,
            goal_id: db.goal_id,
            dedupe_key: db.dedupe_key,
            read: db.is_read,
            created_at: db.created_at,
        })
    }
}

#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::notification_settings)]
#[diesel(primary_key(user_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettingsDB {
    pub user_id: String,
    pub goal_reminders: bool,
    pub achievement_alerts: bool,
    pub business_alerts: bool,
    pub updated_at: NaiveDateTime,
}

impl NotificationSettingsDB {
    pub fn from_domain(settings: NotificationSettings, updated_at: NaiveDateTime) -> Self {
        Self {
            user_id: settings.user_id,
            goal_reminders: settings.goal_reminders,
            achievement_alerts: settings.achievement_alerts,
            business_alerts: settings.business_alerts,
            updated_at,
        }
    }
}

impl From<NotificationSettingsDB> for NotificationSettings {
    fn from(db: NotificationSettingsDB) -> Self {
        Self {
            user_id: db.user_id,
            goal_reminders: db.goal_reminders,
            achievement_alerts: db.achievement_alerts,
            business_alerts: db.business_alerts,
        }
    }
}
