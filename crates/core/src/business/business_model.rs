//! Organization dashboard models.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::carbon::EmissionCategory;
use crate::goals::{Goal, GoalStatus};

/// Recommended weekly CO2 budget per employee (about 12 t/year).
pub const WEEKLY_CARBON_LIMIT_KG: Decimal = dec!(230);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub admin_user_id: String,
    pub name: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationMember {
    pub user_id: String,
    pub organization_id: String,
    pub display_name: String,
    pub email: String,
    pub joined_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeCarbonSummary {
    pub user_id: String,
    pub display_name: String,
    pub email: String,
    pub weekly_co2: Decimal,
    pub exceeds_limit: bool,
    pub goals_completed: usize,
    pub joined_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeOverview {
    pub organization_name: String,
    pub employees: Vec<EmployeeCarbonSummary>,
    pub total_employees: usize,
    pub weekly_limit: Decimal,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GoalCounts {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl GoalCounts {
    pub fn from_goals(goals: &[Goal]) -> Self {
        let completed = goals
            .iter()
            .filter(|g| g.status == GoalStatus::Completed)
            .count();
        GoalCounts {
            total: goals.len(),
            completed,
            pending: goals.len() - completed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeCarbonDetail {
    pub employee: OrganizationMember,
    pub weekly_co2: Decimal,
    pub monthly_co2: Decimal,
    pub exceeds_limit: bool,
    pub by_category: BTreeMap<EmissionCategory, Decimal>,
    pub goals: GoalCounts,
    pub weekly_limit: Decimal,
}
