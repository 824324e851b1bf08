use std::sync::Arc;

use super::extract::{ApiJson, ApiPath};
use crate::{auth::AuthUser, error::ApiResult, main_lib::AppState};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use footprint_core::{
    goals::{Achievement, Goal, NewGoal},
    utils::time_utils::utc_today,
};
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Deserialize)]
struct ProgressBody {
    value: Decimal,
}

async fn get_goals(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> ApiResult<Json<Vec<Goal>>> {
    let goals = state.goal_service.get_goals(&user_id)?;
    Ok(Json(goals))
}

async fn create_goal(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    ApiJson(goal): ApiJson<NewGoal>,
) -> ApiResult<(StatusCode, Json<Goal>)> {
    let g = state
        .goal_service
        .create_goal(&user_id, goal, utc_today())
        .await?;
    Ok((StatusCode::CREATED, Json(g)))
}

async fn toggle_goal(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Json<Goal>> {
    let g = state.goal_service.toggle_goal(&user_id, &id).await?;
    Ok(Json(g))
}

async fn set_progress(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    ApiPath(id): ApiPath<String>,
    ApiJson(body): ApiJson<ProgressBody>,
) -> ApiResult<Json<Goal>> {
    let g = state
        .goal_service
        .set_progress(&user_id, &id, body.value)
        .await?;
    Ok(Json(g))
}

async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<StatusCode> {
    let _ = state.goal_service.delete_goal(&user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_achievements(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> ApiResult<Json<Vec<Achievement>>> {
    let achievements = state.goal_service.get_achievements(&user_id)?;
    Ok(Json(achievements))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/goals", get(get_goals).post(create_goal))
        .route("/goals/{id}", delete(delete_goal))
        .route("/goals/{id}/toggle", post(toggle_goal))
        .route("/goals/{id}/progress", put(set_progress))
        .route("/achievements", get(get_achievements))
}
