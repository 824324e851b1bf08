use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use footprint_core::errors::Error;
use footprint_core::goals::{
    Achievement, AchievementRepositoryTrait, Goal, GoalRepositoryTrait, GoalStatus,
    NewAchievement, NewGoal,
};
use footprint_core::Result;

use super::model::{AchievementDB, GoalDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::achievements;
use crate::schema::goals;
use crate::schema::goals::dsl::*;
use crate::DATE_FORMAT;

pub struct GoalRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl GoalRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        GoalRepository { pool, writer }
    }

    /// Applies `changes` to one goal inside the writer's transaction and
    /// returns the stored row, or `None` when no row matched.
    async fn update_and_reload<F>(&self, goal_id: &str, changes: F) -> Result<Option<Goal>>
    where
        F: FnOnce(&mut SqliteConnection, &str, NaiveDateTime) -> QueryResult<usize>
            + Send
            + 'static,
    {
        let goal_id = goal_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Option<Goal>> {
                let now = Utc::now().naive_utc();
                let affected = changes(conn, &goal_id, now).map_err(StorageError::from)?;
                if affected == 0 {
                    return Ok(None);
                }
                let row = goals
                    .find(&goal_id)
                    .first::<GoalDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(Some(Goal::from(row)))
            })
            .await
    }
}

fn missing(goal_id: &str) -> Error {
    Error::NotFound(format!("Goal {} not found", goal_id))
}

#[async_trait]
impl GoalRepositoryTrait for GoalRepository {
    fn get_goal(&self, goal_id: &str) -> Result<Goal> {
        let mut conn = get_connection(&self.pool)?;
        let row = goals
            .find(goal_id)
            .first::<GoalDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(Goal::from(row))
    }

    fn list_goals(&self, owner: &str) -> Result<Vec<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = goals
            .filter(user_id.eq(owner))
            .order(created_at.desc())
            .load::<GoalDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Goal::from).collect())
    }

    fn list_category_goals(&self, owner: &str) -> Result<Vec<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = goals
            .filter(user_id.eq(owner))
            .filter(category.is_not_null())
            .order(created_at.desc())
            .load::<GoalDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Goal::from).collect())
    }

    fn list_pending_goals_due_by(&self, cutoff: NaiveDate) -> Result<Vec<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = goals
            .filter(status.eq(GoalStatus::Pending.as_str()))
            .filter(deadline.le(cutoff.format(DATE_FORMAT).to_string()))
            .order(deadline.asc())
            .load::<GoalDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Goal::from).collect())
    }

    async fn insert_goal(&self, owner: &str, new_goal: NewGoal) -> Result<Goal> {
        let now = Utc::now().naive_utc();
        let goal_db = GoalDB::from(Goal {
            id: Uuid::new_v4().to_string(),
            user_id: owner.to_string(),
            title: new_goal.title,
            target_value: new_goal.target_value,
            current_value: new_goal.current_value.unwrap_or_default(),
            unit: new_goal.unit,
            deadline: new_goal.deadline,
            status: GoalStatus::Pending,
            category: new_goal.category,
            created_at: now,
            updated_at: now,
        });

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Goal> {
                let result_db = diesel::insert_into(goals::table)
                    .values(&goal_db)
                    .returning(GoalDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Goal::from(result_db))
            })
            .await
    }

    async fn update_goal_progress(&self, goal_id: &str, value: Decimal) -> Result<Goal> {
        let value = value.to_string();
        self.update_and_reload(goal_id, move |conn, target_id, now| {
            diesel::update(goals.find(target_id))
                .set((current_value.eq(value), updated_at.eq(now)))
                .execute(conn)
        })
        .await?
        .ok_or_else(|| missing(goal_id))
    }

    /// The `status = 'pending'` guard makes the completion edge single-shot:
    /// of two racing writers only one sees an affected row.
    async fn complete_goal_if_pending(
        &self,
        goal_id: &str,
        value: Decimal,
    ) -> Result<Option<Goal>> {
        let value = value.to_string();
        self.update_and_reload(goal_id, move |conn, target_id, now| {
            diesel::update(
                goals
                    .find(target_id)
                    .filter(status.eq(GoalStatus::Pending.as_str())),
            )
            .set((
                current_value.eq(value),
                status.eq(GoalStatus::Completed.as_str()),
                updated_at.eq(now),
            ))
            .execute(conn)
        })
        .await
    }

    async fn set_goal_status(&self, goal_id: &str, new_status: GoalStatus) -> Result<Goal> {
        self.update_and_reload(goal_id, move |conn, target_id, now| {
            diesel::update(goals.find(target_id))
                .set((status.eq(new_status.as_str()), updated_at.eq(now)))
                .execute(conn)
        })
        .await?
        .ok_or_else(|| missing(goal_id))
    }

    async fn delete_goal(&self, goal_id: &str) -> Result<usize> {
        let goal_id = goal_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(goals.find(goal_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}

pub struct AchievementRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AchievementRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        AchievementRepository { pool, writer }
    }
}

#[async_trait]
impl AchievementRepositoryTrait for AchievementRepository {
    fn list_achievements(&self, owner: &str) -> Result<Vec<Achievement>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = achievements::table
            .filter(achievements::user_id.eq(owner))
            .order(achievements::completed_at.desc())
            .load::<AchievementDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Achievement::from).collect())
    }

    async fn insert_achievement(&self, new_achievement: NewAchievement) -> Result<Achievement> {
        let row = AchievementDB::from_new(Uuid::new_v4().to_string(), new_achievement);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Achievement> {
                let result_db = diesel::insert_into(achievements::table)
                    .values(&row)
                    .returning(AchievementDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Achievement::from(result_db))
            })
            .await
    }
}
