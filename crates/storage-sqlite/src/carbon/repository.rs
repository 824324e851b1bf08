use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use footprint_core::carbon::{
    add_co2, CarbonEntry, CarbonRepositoryTrait, DateRange, EmissionCategory, NewCarbonEntry,
};
use footprint_core::Result;

use super::model::{CarbonEntryDB, NewCarbonEntryDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::carbon_entries;
use crate::schema::carbon_entries::dsl::*;
use crate::{parse_decimal_column, DATE_FORMAT};

pub struct CarbonRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl CarbonRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        CarbonRepository { pool, writer }
    }
}

fn day_text(day: NaiveDate) -> String {
    day.format(DATE_FORMAT).to_string()
}

#[async_trait]
impl CarbonRepositoryTrait for CarbonRepository {
    async fn append_entries(&self, entries: Vec<NewCarbonEntry>) -> Result<Vec<CarbonEntry>> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Vec<CarbonEntry>> {
                let now = Utc::now().naive_utc();
                let rows: Vec<NewCarbonEntryDB> = entries
                    .into_iter()
                    .map(|entry| {
                        NewCarbonEntryDB::from_domain(Uuid::new_v4().to_string(), entry, now)
                    })
                    .collect();

                let mut created = Vec::with_capacity(rows.len());
                for row in &rows {
                    let inserted = diesel::insert_into(carbon_entries::table)
                        .values(row)
                        .returning(CarbonEntryDB::as_returning())
                        .get_result(conn)
                        .map_err(StorageError::from)?;
                    created.push(CarbonEntry::from(inserted));
                }
                Ok(created)
            })
            .await
    }

    fn list_entries(
        &self,
        user: &str,
        range: Option<DateRange>,
    ) -> Result<Vec<CarbonEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = carbon_entries
            .filter(user_id.eq(user))
            .order((entry_date.asc(), created_at.asc()))
            .into_boxed();
        if let Some(r) = range {
            query = query
                .filter(entry_date.ge(day_text(r.from)))
                .filter(entry_date.le(day_text(r.to)));
        }
        let rows = query
            .load::<CarbonEntryDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(CarbonEntry::from).collect())
    }

    fn sum_co2_by_category(
        &self,
        user: &str,
        emission_category: EmissionCategory,
        range: Option<DateRange>,
    ) -> Result<Decimal> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = carbon_entries
            .filter(user_id.eq(user))
            .filter(category.eq(emission_category.as_str()))
            .select(co2_amount)
            .into_boxed();
        if let Some(r) = range {
            query = query
                .filter(entry_date.ge(day_text(r.from)))
                .filter(entry_date.le(day_text(r.to)));
        }
        // SQL SUM over TEXT would go through floating point.
        let amounts = query.load::<String>(&mut conn).map_err(StorageError::from)?;
        amounts.iter().try_fold(Decimal::ZERO, |total, amount| {
            add_co2(total, parse_decimal_column(amount, "co2_amount"))
        })
    }

    async fn delete_entries_for_day(&self, user: &str, day: NaiveDate) -> Result<usize> {
        let user = user.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(
                    carbon_entries
                        .filter(user_id.eq(user))
                        .filter(entry_date.eq(day_text(day))),
                )
                .execute(conn)
                .map_err(StorageError::from)?)
            })
            .await
    }
}
