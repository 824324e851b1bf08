//! Goals domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::carbon::EmissionCategory;
use crate::errors::{Result, ValidationError};
use crate::utils::time_utils::ensure_supported_day;

/// Minimum number of characters in a goal title.
pub const MIN_GOAL_TITLE_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Pending,
    Completed,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Pending => "pending",
            GoalStatus::Completed => "completed",
        }
    }

    pub fn toggled(&self) -> GoalStatus {
        match self {
            GoalStatus::Pending => GoalStatus::Completed,
            GoalStatus::Completed => GoalStatus::Pending,
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(GoalStatus::Pending),
            "completed" => Ok(GoalStatus::Completed),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown goal status: {}",
                other
            ))),
        }
    }
}

/// Ledger category a goal tracks automatically. A goal without one is manual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalCategory {
    Electricity,
    Transport,
    Flight,
    Fuel,
    Food,
    Waste,
}

impl GoalCategory {
    pub fn emission_category(&self) -> EmissionCategory {
        match self {
            GoalCategory::Electricity => EmissionCategory::Electricity,
            GoalCategory::Transport => EmissionCategory::Transport,
            GoalCategory::Flight => EmissionCategory::Flight,
            GoalCategory::Fuel => EmissionCategory::Fuel,
            GoalCategory::Food => EmissionCategory::Food,
            GoalCategory::Waste => EmissionCategory::Waste,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.emission_category().as_str()
    }
}

impl FromStr for GoalCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "electricity" => Ok(GoalCategory::Electricity),
            "transport" => Ok(GoalCategory::Transport),
            "flight" => Ok(GoalCategory::Flight),
            "fuel" => Ok(GoalCategory::Fuel),
            "food" => Ok(GoalCategory::Food),
            "waste" => Ok(GoalCategory::Waste),
            other => Err(ValidationError::InvalidInput(format!(
                "Unknown goal category: {}",
                other
            ))),
        }
    }
}

/// Domain model representing a goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub target_value: Decimal,
    pub current_value: Decimal,
    pub unit: String,
    pub deadline: NaiveDate,
    pub status: GoalStatus,
    pub category: Option<GoalCategory>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Goal {
    pub fn is_pending(&self) -> bool {
        self.status == GoalStatus::Pending
    }

    pub fn is_category_linked(&self) -> bool {
        self.category.is_some()
    }

    pub fn target_reached(&self) -> bool {
        self.current_value >= self.target_value
    }
}

/// Input model for creating a new goal
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub title: String,
    pub target_value: Decimal,
    #[serde(default)]
    pub current_value: Option<Decimal>,
    pub unit: String,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub category: Option<GoalCategory>,
}

impl NewGoal {
    /// Checks creation constraints against the caller's current day.
    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        if self.title.trim().chars().count() < MIN_GOAL_TITLE_LEN {
            return Err(ValidationError::InvalidInput(format!(
                "Goal title must be at least {} characters",
                MIN_GOAL_TITLE_LEN
            ))
            .into());
        }
        if self.target_value <= Decimal::ZERO {
            return Err(
                ValidationError::InvalidInput("Target value must be positive".to_string()).into(),
            );
        }
        if self.current_value.is_some_and(|v| v.is_sign_negative() && !v.is_zero()) {
            return Err(ValidationError::InvalidInput(
                "Current value cannot be negative".to_string(),
            )
            .into());
        }
        if self.unit.trim().is_empty() {
            return Err(ValidationError::MissingField("unit".to_string()).into());
        }
        ensure_supported_day(self.deadline)?;
        if self.deadline <= today {
            return Err(ValidationError::InvalidInput(format!(
                "Deadline {} must be after {}",
                self.deadline, today
            ))
            .into());
        }
        Ok(())
    }
}

/// Record of a goal reaching its target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub user_id: String,
    pub goal_id: String,
    pub title: String,
    pub target_value: Decimal,
    pub unit: String,
    pub completed_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewAchievement {
    pub user_id: String,
    pub goal_id: String,
    pub title: String,
    pub target_value: Decimal,
    pub unit: String,
    pub completed_at: NaiveDateTime,
}

impl NewAchievement {
    pub fn for_goal(goal: &Goal, completed_at: NaiveDateTime) -> Self {
        NewAchievement {
            user_id: goal.user_id.clone(),
            goal_id: goal.id.clone(),
            title: goal.title.clone(),
            target_value: goal.target_value,
            unit: goal.unit.clone(),
            completed_at,
        }
    }
}

/// Outcome of one reconciliation pass over a user's category-linked goals.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    pub goals_evaluated: usize,
    pub completed_goal_ids: Vec<String>,
    pub failed_goal_ids: Vec<String>,
}
