use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::error;
use std::sync::Arc;
use uuid::Uuid;

use footprint_core::notifications::{
    NewNotification, Notification, NotificationRepositoryTrait, NotificationSettings,
    NotificationType,
};
use footprint_core::Result;

use super::model::{NewNotificationDB, NotificationDB, NotificationSettingsDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::notification_settings;
use crate::schema::notifications;
use crate::schema::notifications::dsl::*;
use crate::utils::chunk_for_sqlite;

pub struct NotificationRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl NotificationRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        NotificationRepository { pool, writer }
    }
}

/// Rows with an unknown type are skipped rather than failing the whole read.
fn to_domain(rows: Vec<NotificationDB>) -> Vec<Notification> {
    rows.into_iter()
        .filter_map(|row| {
            let row_id = row.id.clone();
            Notification::try_from(row)
                .map_err(|e| error!("Skipping notification {}: {}", row_id, e))
                .ok()
        })
        .collect()
}

#[async_trait]
impl NotificationRepositoryTrait for NotificationRepository {
    fn list_notifications(&self, owner: &str, limit: i64) -> Result<Vec<Notification>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = notifications
            .filter(user_id.eq(owner))
            .order(created_at.desc())
            .limit(limit)
            .load::<NotificationDB>(&mut conn)
            .into_core()?;
        Ok(to_domain(rows))
    }

    fn find_latest(
        &self,
        owner: &str,
        for_goal: &str,
        kind: NotificationType,
        key: &str,
    ) -> Result<Option<Notification>> {
        let mut conn = get_connection(&self.pool)?;
        let row = notifications
            .filter(user_id.eq(owner))
            .filter(goal_id.eq(for_goal))
            .filter(notification_type.eq(kind.as_str()))
            .filter(dedupe_key.eq(key))
            .order(created_at.desc())
            .first::<NotificationDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.and_then(|r| to_domain(vec![r]).pop()))
    }

    async fn insert_notification(
        &self,
        new_notification: NewNotification,
    ) -> Result<Notification> {
        let row = NewNotificationDB::from_domain(Uuid::new_v4().to_string(), new_notification);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Notification> {
                let inserted = diesel::insert_into(notifications::table)
                    .values(&row)
                    .returning(NotificationDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                let notification = Notification::try_from(inserted)?;
                Ok(notification)
            })
            .await
    }

    async fn mark_all_read(&self, owner: &str) -> Result<usize> {
        let owner = owner.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::update(
                    notifications
                        .filter(user_id.eq(owner))
                        .filter(is_read.eq(false)),
                )
                .set(is_read.eq(true))
                .execute(conn)
                .into_core()
            })
            .await
    }

    async fn delete_all(&self, owner: &str) -> Result<usize> {
        let owner = owner.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(notifications.filter(user_id.eq(owner)))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    async fn delete_notifications(&self, owner: &str, ids: Vec<String>) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let owner = owner.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut deleted = 0;
                for chunk in chunk_for_sqlite(&ids) {
                    deleted += diesel::delete(
                        notifications
                            .filter(user_id.eq(&owner))
                            .filter(id.eq_any(chunk)),
                    )
                    .execute(conn)
                    .map_err(StorageError::from)?;
                }
                Ok(deleted)
            })
            .await
    }

    fn get_settings(&self, owner: &str) -> Result<Option<NotificationSettings>> {
        let mut conn = get_connection(&self.pool)?;
        let row = notification_settings::table
            .find(owner)
            .first::<NotificationSettingsDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(NotificationSettings::from))
    }

    async fn upsert_settings(
        &self,
        settings: NotificationSettings,
    ) -> Result<NotificationSettings> {
        let row = NotificationSettingsDB::from_domain(settings, Utc::now().naive_utc());
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<NotificationSettings> {
                diesel::insert_into(notification_settings::table)
                    .values(&row)
                    .on_conflict(notification_settings::user_id)
                    .do_update()
                    .set(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                let stored = notification_settings::table
                    .find(&row.user_id)
                    .first::<NotificationSettingsDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(NotificationSettings::from(stored))
            })
            .await
    }
}
