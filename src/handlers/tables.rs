//! Table-driven CRUD handlers: any catalog table, addressed by name.

use crate::domain::PROFILE_TABLE;
use crate::error::AppError;
use crate::response::{created, no_content, ok};
use crate::schema::{list_tables, ColumnMeta};
use crate::service::{RecordAccessor, RequestValidator};
use crate::state::AppState;
use crate::workflow::ProfileWorkflow;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
pub struct TablesBody {
    pub tables: Vec<String>,
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct StructureBody {
    pub columns: Vec<ColumnMeta>,
    pub primary_key: Option<String>,
}

pub async fn root(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.pool.acquire().await?;
    let tables = list_tables(&mut conn).await?;
    Ok(Json(TablesBody {
        tables: tables.into_iter().collect(),
        message: "Utilisez /<nom_table> pour accéder aux données",
    }))
}

pub async fn structure(
    State(state): State<AppState>,
    Path(table): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut conn = state.pool.acquire().await?;
    let meta = RecordAccessor::structure(&mut conn, &table).await?;
    let primary_key = meta.columns.iter().find(|c| c.primary_key).map(|c| c.name.clone());
    Ok(Json(StructureBody {
        columns: meta.columns,
        primary_key,
    }))
}

pub async fn list(
    State(state): State<AppState>,
    Path(table): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(table = %table, "list records");
    let mut conn = state.pool.acquire().await?;
    let rows = RecordAccessor::list_all(&mut conn, &table).await?;
    Ok(ok(rows))
}

pub async fn read(
    State(state): State<AppState>,
    Path((table, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(table = %table, id = %id, "read record");
    let mut conn = state.pool.acquire().await?;
    let id = Value::String(id);
    let row = if table == PROFILE_TABLE {
        ProfileWorkflow::get_profile(&mut conn, &id).await?
    } else {
        RecordAccessor::get_by_id(&mut conn, &table, &id).await?
    };
    Ok(ok(row))
}

pub async fn create(
    State(state): State<AppState>,
    Path(table): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(table = %table, "create record");
    let Json(body) = payload?;
    let fields = RequestValidator::body_to_map(body)?;
    let mut conn = state.pool.acquire().await?;
    let row = RecordAccessor::create(&mut conn, &table, &fields).await?;
    Ok(created(row))
}

pub async fn update(
    State(state): State<AppState>,
    Path((table, id)): Path<(String, String)>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(table = %table, id = %id, "update record");
    let Json(body) = payload?;
    let fields = RequestValidator::body_to_map(body)?;
    let mut conn = state.pool.acquire().await?;
    let row = RecordAccessor::update(&mut conn, &table, &Value::String(id), &fields).await?;
    Ok(ok(row))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((table, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!(table = %table, id = %id, "delete record");
    let mut conn = state.pool.acquire().await?;
    RecordAccessor::delete_by_id(&mut conn, &table, &Value::String(id)).await?;
    Ok(no_content())
}
