use std::sync::Arc;

use super::extract::{ApiPath, ApiQuery};
use crate::{auth::AuthUser, error::ApiResult, main_lib::AppState};
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{NaiveDate, Utc};
use footprint_core::{
    business::{EmployeeCarbonDetail, EmployeeOverview},
    notifications::{EmitOutcome, Notification, SuppressionReason},
    utils::time_utils::utc_today,
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
struct DayQuery {
    date: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct AlertBody {
    message: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AlertResponse {
    sent: bool,
    notification: Option<Notification>,
    suppressed_reason: Option<SuppressionReason>,
}

impl From<EmitOutcome> for AlertResponse {
    fn from(outcome: EmitOutcome) -> Self {
        match outcome {
            EmitOutcome::Emitted(notification) => AlertResponse {
                sent: true,
                notification: Some(notification),
                suppressed_reason: None,
            },
            EmitOutcome::Suppressed(reason) => AlertResponse {
                sent: false,
                notification: None,
                suppressed_reason: Some(reason),
            },
        }
    }
}

async fn employee_summaries(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(admin_id)): Extension<AuthUser>,
    ApiQuery(q): ApiQuery<DayQuery>,
) -> ApiResult<Json<EmployeeOverview>> {
    let day = q.date.unwrap_or_else(utc_today);
    let overview = state.business_service.employee_summaries(&admin_id, day)?;
    Ok(Json(overview))
}

async fn employee_detail(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(admin_id)): Extension<AuthUser>,
    ApiPath(member_id): ApiPath<String>,
    ApiQuery(q): ApiQuery<DayQuery>,
) -> ApiResult<Json<EmployeeCarbonDetail>> {
    let day = q.date.unwrap_or_else(utc_today);
    let detail = state
        .business_service
        .employee_detail(&admin_id, &member_id, day)?;
    Ok(Json(detail))
}

async fn send_alert(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(admin_id)): Extension<AuthUser>,
    ApiPath(member_id): ApiPath<String>,
    body: Option<Json<AlertBody>>,
) -> ApiResult<Json<AlertResponse>> {
    let message = body.and_then(|Json(b)| b.message);
    let outcome = state
        .business_service
        .send_alert(&admin_id, &member_id, message, Utc::now())
        .await?;
    Ok(Json(outcome.into()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/business/employees", get(employee_summaries))
        .route("/business/employees/{id}", get(employee_detail))
        .route("/business/employees/{id}/alert", post(send_alert))
}
