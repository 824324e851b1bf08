//! Database models for organizations.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use footprint_core::business::{Organization, OrganizationMember};
use serde::{Deserialize, Serialize};

#[derive(
    Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::organizations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct OrganizationDB {
    pub id: String,
    pub admin_user_id: String,
    pub name: String,
    pub created_at: NaiveDateTime,
}

#[derive(
    Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::organization_members)]
#[diesel(primary_key(organization_id, user_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct OrganizationMemberDB {
    pub organization_id: String,
    pub user_id: String,
    pub display_name: String,
    pub email: String,
    pub joined_at: NaiveDateTime,
}

impl From<OrganizationDB> for Organization {
    fn from(db: OrganizationDB) -> Self {
        Self {
            id: db.id,
            admin_user_id: db.admin_user_id,
            name: db.name,
            created_at: db.created_at,
        }
    }
}

impl From<OrganizationMemberDB> for OrganizationMember {
    fn from(db: OrganizationMemberDB) -> Self {
        Self {
            user_id: db.user_id,
            organization_id: db.organization_id,
            display_name: db.display_name,
            email: db.email,
            joined_at: db.joined_at,
        }
    }
}
