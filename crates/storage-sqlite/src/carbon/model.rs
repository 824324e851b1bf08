//! Database models for carbon ledger entries.

use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use footprint_core::carbon::{CarbonEntry, EmissionCategory, NewCarbonEntry};
use log::error;
use serde::{Deserialize, Serialize};

use crate::{parse_date_column, parse_decimal_column, DATE_FORMAT};

/// Database model for a ledger row. Decimals and dates are stored as TEXT.
#[derive(
    Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::carbon_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct CarbonEntryDB {
    pub id: String,
    pub user_id: String,
    pub category: String,
    pub activity_type: String,
    pub quantity: String,
    pub emission_factor: String,
    pub co2_amount: String,
    pub entry_date: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::carbon_entries)]
pub struct NewCarbonEntryDB {
    pub id: String,
    pub user_id: String,
    pub category: String,
    pub activity_type: String,
    pub quantity: String,
    pub emission_factor: String,
    pub co2_amount: String,
    pub entry_date: String,
    pub created_at: NaiveDateTime,
}

impl NewCarbonEntryDB {
    pub fn from_domain(id: String, entry: NewCarbonEntry, created_at: NaiveDateTime) -> Self {
        Self {
            id,
            user_id: entry.user_id,
            category: entry.category.as_str().to_string(),
            activity_type: entry.activity_type,
            quantity: entry.quantity.to_string(),
            emission_factor: entry.emission_factor.to_string(),
            co2_amount: entry.co2_amount.to_string(),
            entry_date: entry.date.format(DATE_FORMAT).to_string(),
            created_at,
        }
    }
}

impl From<CarbonEntryDB> for CarbonEntry {
    fn from(db: CarbonEntryDB) -> Self {
        let category = EmissionCategory::from_str(&db.category).unwrap_or_else(|e| {
            error!("Carbon entry {} has {}; filing under other", db.id, e);
            EmissionCategory::Other
        });
        Self {
            category,
            quantity: parse_decimal_column(&db.quantity, "quantity"),
            emission_factor: parse_decimal_column(&db.emission_factor, "emission_factor"),
            co2_amount: parse_decimal_column(&db.co2_amount, "co2_amount"),
            date: parse_date_column(&db.entry_date, "entry_date"),
            id: db.id,
            user_id: db.user_id,
            activity_type: db.activity_type,
            created_at: db.created_at,
        }
    }
}
