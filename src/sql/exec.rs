//! Run a [`QueryBuf`] on one connection (pooled or inside a transaction).

use crate::error::AppError;
use crate::sql::{bind_all, row_to_json, QueryBuf};
use serde_json::Value;
use sqlx::sqlite::SqliteQueryResult;
use sqlx::SqliteConnection;

pub async fn fetch_all(conn: &mut SqliteConnection, q: &QueryBuf) -> Result<Vec<Value>, AppError> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let rows = bind_all(sqlx::query(&q.sql), &q.params)
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows.iter().map(row_to_json).collect())
}

pub async fn fetch_optional(conn: &mut SqliteConnection, q: &QueryBuf) -> Result<Option<Value>, AppError> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let row = bind_all(sqlx::query(&q.sql), &q.params)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.map(|r| row_to_json(&r)))
}

pub async fn exists(conn: &mut SqliteConnection, q: &QueryBuf) -> Result<bool, AppError> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query");
    let row = bind_all(sqlx::query(&q.sql), &q.params)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.is_some())
}

pub async fn execute(conn: &mut SqliteConnection, q: &QueryBuf) -> Result<SqliteQueryResult, AppError> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "execute");
    let done = bind_all(sqlx::query(&q.sql), &q.params)
        .execute(&mut *conn)
        .await?;
    Ok(done)
}
