use diesel::prelude::*;
use std::sync::Arc;

use footprint_core::business::{Organization, OrganizationMember, OrganizationRepositoryTrait};
use footprint_core::Result;

use super::model::{OrganizationDB, OrganizationMemberDB};
use crate::db::{get_connection, DbPool};
use crate::errors::IntoCore;
use crate::schema::{organization_members, organizations};

pub struct OrganizationRepository {
    pool: Arc<DbPool>,
}

impl OrganizationRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        OrganizationRepository { pool }
    }
}

impl OrganizationRepositoryTrait for OrganizationRepository {
    fn get_organization_for_admin(&self, admin_user_id: &str) -> Result<Option<Organization>> {
        let mut conn = get_connection(&self.pool)?;
        let row = organizations::table
            .filter(organizations::admin_user_id.eq(admin_user_id))
            .first::<OrganizationDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(Organization::from))
    }

    fn list_members(&self, organization_id: &str) -> Result<Vec<OrganizationMember>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = organization_members::table
            .filter(organization_members::organization_id.eq(organization_id))
            .order(organization_members::joined_at.asc())
            .load::<OrganizationMemberDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(OrganizationMember::from).collect())
    }

    fn get_member(
        &self,
        organization_id: &str,
        user_id: &str,
    ) -> Result<Option<OrganizationMember>> {
        let mut conn = get_connection(&self.pool)?;
        let row = organization_members::table
            .find((organization_id, user_id))
            .first::<OrganizationMemberDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(OrganizationMember::from))
    }
}
