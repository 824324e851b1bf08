use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use log::info;
use rust_decimal::Decimal;

use super::business_model::{
    EmployeeCarbonDetail, EmployeeCarbonSummary, EmployeeOverview, GoalCounts, Organization,
    OrganizationMember, WEEKLY_CARBON_LIMIT_KG,
};
use super::business_traits::{BusinessServiceTrait, OrganizationRepositoryTrait};
use crate::carbon::{
    add_co2, round_co2, total_co2, CarbonRepositoryTrait, DateRange, EmissionCategory,
    MONTHLY_WINDOW_DAYS, WEEKLY_WINDOW_DAYS,
};
use crate::errors::{Error, Result};
use crate::goals::GoalRepositoryTrait;
use crate::notifications::{
    business_alert_message, EmitOutcome, EmitRequest, NotificationServiceTrait,
};

pub struct BusinessService {
    organization_repository: Arc<dyn OrganizationRepositoryTrait>,
    carbon_repository: Arc<dyn CarbonRepositoryTrait>,
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    notification_service: Arc<dyn NotificationServiceTrait>,
}

impl BusinessService {
    pub fn new(
        organization_repository: Arc<dyn OrganizationRepositoryTrait>,
        carbon_repository: Arc<dyn CarbonRepositoryTrait>,
        goal_repository: Arc<dyn GoalRepositoryTrait>,
        notification_service: Arc<dyn NotificationServiceTrait>,
    ) -> Self {
        BusinessService {
            organization_repository,
            carbon_repository,
            goal_repository,
            notification_service,
        }
    }

    fn admin_organization(&self, admin_user_id: &str) -> Result<Organization> {
        self.organization_repository
            .get_organization_for_admin(admin_user_id)?
            .ok_or_else(|| Error::Forbidden("Business account required".to_string()))
    }

    fn organization_member(
        &self,
        organization: &Organization,
        member_user_id: &str,
    ) -> Result<OrganizationMember> {
        self.organization_repository
            .get_member(&organization.id, member_user_id)?
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "Employee {} not found in your organization",
                    member_user_id
                ))
            })
    }

    fn weekly_co2(&self, user_id: &str, day: NaiveDate) -> Result<Decimal> {
        let entries = self
            .carbon_repository
            .list_entries(user_id, Some(DateRange::ending_on(day, WEEKLY_WINDOW_DAYS)?))?;
        Ok(round_co2(total_co2(&entries)?))
    }
}

#[async_trait]
impl BusinessServiceTrait for BusinessService {
    fn employee_summaries(&self, admin_user_id: &str, day: NaiveDate) -> Result<EmployeeOverview> {
        let organization = self.admin_organization(admin_user_id)?;
        let members = self.organization_repository.list_members(&organization.id)?;

        let mut employees = Vec::with_capacity(members.len());
        for member in members {
            let weekly_co2 = self.weekly_co2(&member.user_id, day)?;
            let goals = self.goal_repository.list_goals(&member.user_id)?;
            employees.push(EmployeeCarbonSummary {
                weekly_co2,
                exceeds_limit: weekly_co2 > WEEKLY_CARBON_LIMIT_KG,
                goals_completed: GoalCounts::from_goals(&goals).completed,
                user_id: member.user_id,
                display_name: member.display_name,
                email: member.email,
                joined_at: member.joined_at,
            });
        }
        employees.sort_by(|a, b| b.weekly_co2.cmp(&a.weekly_co2));

        Ok(EmployeeOverview {
            organization_name: organization.name,
            total_employees: employees.len(),
            employees,
            weekly_limit: WEEKLY_CARBON_LIMIT_KG,
        })
    }

    fn employee_detail(
        &self,
        admin_user_id: &str,
        member_user_id: &str,
        day: NaiveDate,
    ) -> Result<EmployeeCarbonDetail> {
        let organization = self.admin_organization(admin_user_id)?;
        let employee = self.organization_member(&organization, member_user_id)?;

        let weekly_range = DateRange::ending_on(day, WEEKLY_WINDOW_DAYS)?;
        let entries = self.carbon_repository.list_entries(
            member_user_id,
            Some(DateRange::ending_on(day, MONTHLY_WINDOW_DAYS)?),
        )?;

        let mut by_category: BTreeMap<EmissionCategory, Decimal> = BTreeMap::new();
        for entry in &entries {
            let total = by_category.entry(entry.category).or_insert(Decimal::ZERO);
            *total = add_co2(*total, entry.co2_amount)?;
        }
        let weekly_co2 = round_co2(total_co2(
            entries.iter().filter(|e| weekly_range.contains(e.date)),
        )?);
        let goals = self.goal_repository.list_goals(member_user_id)?;

        Ok(EmployeeCarbonDetail {
            employee,
            weekly_co2,
            monthly_co2: round_co2(total_co2(&entries)?),
            exceeds_limit: weekly_co2 > WEEKLY_CARBON_LIMIT_KG,
            by_category: by_category
                .into_iter()
                .map(|(category, total)| (category, round_co2(total)))
                .collect(),
            goals: GoalCounts::from_goals(&goals),
            weekly_limit: WEEKLY_CARBON_LIMIT_KG,
        })
    }

    async fn send_alert(
        &self,
        admin_user_id: &str,
        member_user_id: &str,
        message: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<EmitOutcome> {
        let organization = self.admin_organization(admin_user_id)?;
        let employee = self.organization_member(&organization, member_user_id)?;

        let message = message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| business_alert_message(&organization.name, WEEKLY_CARBON_LIMIT_KG));

        let outcome = self
            .notification_service
            .emit(EmitRequest::business_alert(&employee.user_id, message), now)
            .await?;
        info!(
            "Business alert from organization {} to user {}: {}",
            organization.id,
            employee.user_id,
            if outcome.is_emitted() { "sent" } else { "suppressed" }
        );
        Ok(outcome)
    }
}
