//! Business module - organization admin dashboard and employee alerts.

mod business_model;
mod business_service;
mod business_traits;


pub use business_model::{
    EmployeeCarbonDetail, EmployeeCarbonSummary, EmployeeOverview, GoalCounts, Organization,
    OrganizationMember, WEEKLY_CARBON_LIMIT_KG,
};
pub use business_service::BusinessService;
pub use business_traits::{BusinessServiceTrait, OrganizationRepositoryTrait};
