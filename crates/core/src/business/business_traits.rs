use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::business::business_model::{
    EmployeeCarbonDetail, EmployeeOverview, Organization, OrganizationMember,
};
use crate::errors::Result;
use crate::notifications::EmitOutcome;

/// Read-only view of organizations. Membership is managed elsewhere.
pub trait OrganizationRepositoryTrait: Send + Sync {
    /// The organization administered by `admin_user_id`, if any.
    fn get_organization_for_admin(&self, admin_user_id: &str) -> Result<Option<Organization>>;
    fn list_members(&self, organization_id: &str) -> Result<Vec<OrganizationMember>>;
    fn get_member(
        &self,
        organization_id: &str,
        user_id: &str,
    ) -> Result<Option<OrganizationMember>>;
}

/// Trait for the organization admin dashboard
#[async_trait]
pub trait BusinessServiceTrait: Send + Sync {
    fn employee_summaries(&self, admin_user_id: &str, day: NaiveDate) -> Result<EmployeeOverview>;

    fn employee_detail(
        &self,
        admin_user_id: &str,
        member_user_id: &str,
        day: NaiveDate,
    ) -> Result<EmployeeCarbonDetail>;

    async fn send_alert(
        &self,
        admin_user_id: &str,
        member_user_id: &str,
        message: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<EmitOutcome>;
}
