use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;

use super::carbon_constants::{MONTHLY_WINDOW_DAYS, WEEKLY_WINDOW_DAYS};
use super::carbon_model::{
    add_co2, round_co2, total_co2, ActivityQuantities, CarbonEntry, CarbonSummary,
    DailyCarbonTotal, DateRange, EmissionCategory, NewCarbonEntry,
};
use super::carbon_traits::{CarbonRepositoryTrait, CarbonServiceTrait};
use super::emission_converter::convert;
use crate::errors::{Error, Result};
use crate::goals::GoalReconcilerTrait;
use crate::utils::time_utils::{ensure_supported_day, get_days_between};

pub struct CarbonService {
    carbon_repository: Arc<dyn CarbonRepositoryTrait>,
    goal_reconciler: Arc<dyn GoalReconcilerTrait>,
}

impl CarbonService {
    pub fn new(
        carbon_repository: Arc<dyn CarbonRepositoryTrait>,
        goal_reconciler: Arc<dyn GoalReconcilerTrait>,
    ) -> Self {
        CarbonService {
            carbon_repository,
            goal_reconciler,
        }
    }

    /// Converts every activity up front so a single bad key rejects the whole batch.
    fn build_entries(
        user_id: &str,
        day: NaiveDate,
        activities: &ActivityQuantities,
    ) -> Result<Vec<NewCarbonEntry>> {
        let mut entries = Vec::with_capacity(activities.len());
        for (activity_type, quantity) in activities {
            let conversion = convert(activity_type, *quantity)?;
            if quantity.is_zero() {
                continue;
            }
            entries.push(NewCarbonEntry {
                user_id: user_id.to_string(),
                category: conversion.category,
                activity_type: activity_type.clone(),
                quantity: *quantity,
                emission_factor: conversion.factor,
                co2_amount: conversion.co2_amount,
                date: day,
            });
        }
        Ok(entries)
    }
}

/// Reconciliation is best-effort relative to the ledger write that triggered it.
async fn reconcile_after_write(goal_reconciler: &dyn GoalReconcilerTrait, user_id: &str) {
    match goal_reconciler.reconcile_user_goals(user_id).await {
        Ok(report) => debug!(
            "Reconciled {} goals for user {} ({} completed, {} failed)",
            report.goals_evaluated,
            user_id,
            report.completed_goal_ids.len(),
            report.failed_goal_ids.len()
        ),
        Err(e) => warn!("Goal reconciliation failed for user {}: {}", user_id, e),
    }
}

/// Runs a ledger write and the reconciliation after it on a detached task, so a
/// dropped caller cannot leave committed rows unreconciled.
async fn write_then_reconcile<T, W>(
    goal_reconciler: Arc<dyn GoalReconcilerTrait>,
    user_id: &str,
    write: W,
    changed: fn(&T) -> bool,
) -> Result<T>
where
    T: Send + 'static,
    W: Future<Output = Result<T>> + Send + 'static,
{
    let user_id = user_id.to_string();
    tokio::spawn(async move {
        let written = write.await?;
        if changed(&written) {
            reconcile_after_write(goal_reconciler.as_ref(), &user_id).await;
        }
        Ok(written)
    })
    .await
    .map_err(|e| Error::Unexpected(format!("Ledger write task failed: {}", e)))?
}

#[async_trait]
impl CarbonServiceTrait for CarbonService {
    async fn record_activities(
        &self,
        user_id: &str,
        day: NaiveDate,
        activities: &ActivityQuantities,
    ) -> Result<Vec<CarbonEntry>> {
        ensure_supported_day(day)?;
        let new_entries = Self::build_entries(user_id, day, activities)?;
        if new_entries.is_empty() {
            debug!("No non-zero activities for user {} on {}", user_id, day);
            return Ok(Vec::new());
        }

        let carbon_repository = self.carbon_repository.clone();
        write_then_reconcile(
            self.goal_reconciler.clone(),
            user_id,
            async move { carbon_repository.append_entries(new_entries).await },
            |created: &Vec<CarbonEntry>| !created.is_empty(),
        )
        .await
    }

    fn list_entries(&self, user_id: &str, range: Option<DateRange>) -> Result<Vec<CarbonEntry>> {
        self.carbon_repository.list_entries(user_id, range)
    }

    fn aggregate_by_category(
        &self,
        user_id: &str,
        category: EmissionCategory,
        range: Option<DateRange>,
    ) -> Result<Decimal> {
        self.carbon_repository
            .sum_co2_by_category(user_id, category, range)
    }

    async fn delete_entries_for_day(&self, user_id: &str, day: NaiveDate) -> Result<usize> {
        ensure_supported_day(day)?;
        let carbon_repository = self.carbon_repository.clone();
        let owner = user_id.to_string();
        write_then_reconcile(
            self.goal_reconciler.clone(),
            user_id,
            async move { carbon_repository.delete_entries_for_day(&owner, day).await },
            |deleted: &usize| *deleted > 0,
        )
        .await
    }

    fn get_summary(&self, user_id: &str, day: NaiveDate) -> Result<CarbonSummary> {
        let monthly_range = DateRange::ending_on(day, MONTHLY_WINDOW_DAYS)?;
        let weekly_range = DateRange::ending_on(day, WEEKLY_WINDOW_DAYS)?;
        let entries = self
            .carbon_repository
            .list_entries(user_id, Some(monthly_range))?;

        let mut per_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
        let mut by_category: BTreeMap<EmissionCategory, Decimal> = BTreeMap::new();
        for entry in &entries {
            let day_total = per_day.entry(entry.date).or_insert(Decimal::ZERO);
            *day_total = add_co2(*day_total, entry.co2_amount)?;
            let category_total = by_category.entry(entry.category).or_insert(Decimal::ZERO);
            *category_total = add_co2(*category_total, entry.co2_amount)?;
        }

        let today = total_co2(entries.iter().filter(|e| e.date == day))?;
        let weekly = total_co2(entries.iter().filter(|e| weekly_range.contains(e.date)))?;
        let monthly = total_co2(&entries)?;

        let daily = get_days_between(monthly_range.from, monthly_range.to)
            .into_iter()
            .map(|date| DailyCarbonTotal {
                date,
                co2_amount: round_co2(per_day.get(&date).copied().unwrap_or_default()),
            })
            .collect();

        Ok(CarbonSummary {
            reference_date: day,
            today: round_co2(today),
            weekly: round_co2(weekly),
            monthly: round_co2(monthly),
            by_category: by_category
                .into_iter()
                .map(|(category, total)| (category, round_co2(total)))
                .collect(),
            daily,
        })
    }
}
