use std::sync::Arc;

use super::extract::ApiJson;
use crate::{auth::AuthUser, error::ApiResult, main_lib::AppState};
use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use footprint_core::{
    notifications::{NotificationFeed, NotificationSettings, NotificationSettingsUpdate},
    reminders::SweepReport,
};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AffectedResponse {
    affected: usize,
}

async fn get_feed(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> ApiResult<Json<NotificationFeed>> {
    let feed = state.notification_service.get_feed(&user_id).await?;
    Ok(Json(feed))
}

async fn mark_all_read(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> ApiResult<Json<AffectedResponse>> {
    let affected = state.notification_service.mark_all_read(&user_id).await?;
    Ok(Json(AffectedResponse { affected }))
}

async fn delete_all(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> ApiResult<Json<AffectedResponse>> {
    let affected = state.notification_service.delete_all(&user_id).await?;
    Ok(Json(AffectedResponse { affected }))
}

async fn cleanup_malformed(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> ApiResult<Json<AffectedResponse>> {
    let affected = state
        .notification_service
        .cleanup_malformed(&user_id)
        .await?;
    Ok(Json(AffectedResponse { affected }))
}

async fn get_settings(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> ApiResult<Json<NotificationSettings>> {
    let settings = state.notification_service.get_settings(&user_id).await?;
    Ok(Json(settings))
}

async fn save_settings(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    ApiJson(update): ApiJson<NotificationSettingsUpdate>,
) -> ApiResult<Json<NotificationSettings>> {
    let settings = state
        .notification_service
        .save_settings(&user_id, update)
        .await?;
    Ok(Json(settings))
}

/// Runs the reminder sweep now. Returns an empty report when a sweep is already running.
async fn trigger_sweep(State(state): State<Arc<AppState>>) -> ApiResult<Json<SweepReport>> {
    let report = state.sweeper.sweep(Utc::now()).await?;
    Ok(Json(report))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/notifications", get(get_feed).delete(delete_all))
        .route("/notifications/mark-read", post(mark_all_read))
        .route("/notifications/cleanup", post(cleanup_malformed))
        .route(
            "/notifications/settings",
            get(get_settings).put(save_settings),
        )
        .route("/notifications/sweep", post(trigger_sweep))
}
