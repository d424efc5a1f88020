//! Profile, rights and user-closure handlers.

use crate::error::AppError;
use crate::response::{created, ok};
use crate::service::RequestValidator;
use crate::state::AppState;
use crate::workflow::ProfileWorkflow;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

pub async fn duplicate(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = payload?;
    let body = RequestValidator::body_to_map(body)?;
    let mut conn = state.pool.acquire().await?;
    let profile = ProfileWorkflow::duplicate_profile(&mut conn, &body).await?;
    Ok(created(profile))
}

pub async fn set_right(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = payload?;
    let body = RequestValidator::body_to_map(body)?;
    let mut conn = state.pool.acquire().await?;
    let changed = ProfileWorkflow::set_right(&mut conn, &body).await?;
    Ok(ok(changed))
}

pub async fn close_profile(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = payload?;
    let body = RequestValidator::body_to_map(body)?;
    let mut conn = state.pool.acquire().await?;
    let closed = ProfileWorkflow::close_profile(&mut conn, &body).await?;
    Ok(ok(closed))
}

pub async fn close_user(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = payload?;
    let body = RequestValidator::body_to_map(body)?;
    let mut conn = state.pool.acquire().await?;
    let closed = ProfileWorkflow::close_user(&mut conn, &body).await?;
    Ok(ok(closed))
}

pub async fn rights(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.pool.acquire().await?;
    let rights = ProfileWorkflow::rights_for_profile(&mut conn, &Value::String(profile_id)).await?;
    Ok(ok(rights))
}
