//! Database models for goals.

use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use footprint_core::goals::{Achievement, Goal, GoalCategory, GoalStatus, NewAchievement};
use log::error;
use serde::{Deserialize, Serialize};

use crate::{parse_date_column, parse_decimal_column, DATE_FORMAT};

/// Database model for goals
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct GoalDB {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub target_value: String,
    pub current_value: String,
    pub unit: String,
    pub deadline: String,
    pub status: String,
    pub category: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<GoalDB> for Goal {
    fn from(db: GoalDB) -> Self {
        let status = GoalStatus::from_str(&db.status).unwrap_or_else(|e| {
            error!("Goal {} has unreadable status: {}", db.id, e);
            GoalStatus::Pending
        });
        // An unknown category degrades to a manual goal instead of failing the read.
        let category = db.category.as_deref().and_then(|c| {
            GoalCategory::from_str(c)
                .map_err(|e| error!("Goal {} has unreadable category: {}", db.id, e))
                .ok()
        });
        Self {
            target_value: parse_decimal_column(&db.target_value, "target_value"),
            current_value: parse_decimal_column(&db.current_value, "current_value"),
            deadline: parse_date_column(&db.deadline, "deadline"),
            status,
            category,
            id: db.id,
            user_id: db.user_id,
            title: db.title,
            unit: db.unit,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<Goal> for GoalDB {
    fn from(goal: Goal) -> Self {
        Self {
            id: goal.id,
            user_id: goal.user_id,
            title: goal.title,
            target_value: goal.target_value.to_string(),
            current_value: goal.current_value.to_string(),
            unit: goal.unit,
            deadline: goal.deadline.format(DATE_FORMAT).to_string(),
            status: goal.status.as_str().to_string(),
            category: goal.category.map(|c| c.as_str().to_string()),
            created_at: goal.created_at,
            updated_at: goal.updated_at,
        }
    }
}

#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::achievements)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct AchievementDB {
    pub id: String,
    pub user_id: String,
    pub goal_id: String,
    pub title: String,
    pub target_value: String,
    pub unit: String,
    pub completed_at: NaiveDateTime,
}

impl AchievementDB {
    pub fn from_new(id: String, new_achievement: NewAchievement) -> Self {
        Self {
            id,
            user_id: new_achievement.user_id,
            goal_id: new_achievement.goal_id,
            title: new_achievement.title,
            target_value: new_achievement.target_value.to_string(),
            unit: new_achievement.unit,
            completed_at: new_achievement.completed_at,
        }
    }
}

impl From<AchievementDB> for Achievement {
    fn from(db: AchievementDB) -> Self {
        Self {
            target_value: parse_decimal_column(&db.target_value, "target_value"),
            id: db.id,
            user_id: db.user_id,
            goal_id: db.goal_id,
            title: db.title,
            unit: db.unit,
            completed_at: db.completed_at,
        }
    }
}
