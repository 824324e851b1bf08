use std::sync::Arc;

use super::extract::{ApiJson, ApiPath, ApiQuery};
use crate::{auth::AuthUser, error::ApiResult, main_lib::AppState};
use axum::{
    extract::State,
    routing::{delete, get},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use footprint_core::{
    carbon::{
        ActivityQuantities, CarbonEntry, CarbonSummary, DateRange, EmissionFactor,
        EMISSION_FACTORS,
    },
    utils::time_utils::{earliest_supported_day, latest_supported_day, utc_today},
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordActivitiesBody {
    date: Option<NaiveDate>,
    activities: ActivityQuantities,
}

#[derive(Deserialize)]
struct EntriesQuery {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct SummaryQuery {
    date: Option<NaiveDate>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeletedResponse {
    deleted: usize,
}

async fn record_activities(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    ApiJson(body): ApiJson<RecordActivitiesBody>,
) -> ApiResult<Json<Vec<CarbonEntry>>> {
    let day = body.date.unwrap_or_else(utc_today);
    let entries = state
        .carbon_service
        .record_activities(&user_id, day, &body.activities)
        .await?;
    Ok(Json(entries))
}

async fn list_entries(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    ApiQuery(q): ApiQuery<EntriesQuery>,
) -> ApiResult<Json<Vec<CarbonEntry>>> {
    let range = match (q.from, q.to) {
        (None, None) => None,
        (from, to) => Some(DateRange::new(
            from.unwrap_or_else(earliest_supported_day),
            to.unwrap_or_else(latest_supported_day),
        )?),
    };
    let entries = state.carbon_service.list_entries(&user_id, range)?;
    Ok(Json(entries))
}

async fn delete_entries_for_day(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    ApiPath(date): ApiPath<NaiveDate>,
) -> ApiResult<Json<DeletedResponse>> {
    let deleted = state
        .carbon_service
        .delete_entries_for_day(&user_id, date)
        .await?;
    Ok(Json(DeletedResponse { deleted }))
}

async fn get_summary(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    ApiQuery(q): ApiQuery<SummaryQuery>,
) -> ApiResult<Json<CarbonSummary>> {
    let day = q.date.unwrap_or_else(utc_today);
    let summary = state.carbon_service.get_summary(&user_id, day)?;
    Ok(Json(summary))
}

async fn list_factors() -> Json<Vec<EmissionFactor>> {
    Json(EMISSION_FACTORS.to_vec())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/carbon/entries", get(list_entries).post(record_activities))
        .route("/carbon/entries/{date}", delete(delete_entries_for_day))
        .route("/carbon/summary", get(get_summary))
        .route("/carbon/factors", get(list_factors))
}
