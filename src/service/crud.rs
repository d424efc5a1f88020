//! Generic CRUD over any catalog table of the SQLite database.

use crate::error::AppError;
use crate::schema::{describe_table, TableMeta};
use crate::service::RequestValidator;
use crate::sql::{self, exec};
use serde_json::{Map, Value};
use sqlx::SqliteConnection;

pub struct RecordAccessor;

impl RecordAccessor {
    /// Column layout of a table, validated against the catalog.
    pub async fn structure(conn: &mut SqliteConnection, table: &str) -> Result<TableMeta, AppError> {
        describe_table(conn, table).await
    }

    /// Every row, unfiltered, in storage order.
    pub async fn list_all(conn: &mut SqliteConnection, table: &str) -> Result<Vec<Value>, AppError> {
        let meta = describe_table(conn, table).await?;
        exec::fetch_all(conn, &sql::select_all(&meta)).await
    }

    /// One row by primary key. The id is bound as given; SQLite applies column affinity.
    pub async fn get_by_id(conn: &mut SqliteConnection, table: &str, id: &Value) -> Result<Value, AppError> {
        let meta = describe_table(conn, table).await?;
        let pk = meta.require_primary_key()?;
        exec::fetch_optional(conn, &sql::select_by_id(&meta, pk, id))
            .await?
            .ok_or_else(AppError::record_not_found)
    }

    /// Insert exactly `fields`. Returns `{id, ...fields}` where `id` is the supplied key
    /// value, or the rowid SQLite assigned.
    pub async fn create(
        conn: &mut SqliteConnection,
        table: &str,
        fields: &Map<String, Value>,
    ) -> Result<Value, AppError> {
        let meta = describe_table(conn, table).await?;
        RequestValidator::validate_insert(&meta, fields)?;
        let q = sql::insert(&meta, fields)?;
        let done = exec::execute(conn, &q).await?;
        // composite keys have no single id to echo; fall back to the rowid
        let id = meta
            .primary_key()
            .ok()
            .flatten()
            .and_then(|pk| fields.get(&pk.name))
            .cloned()
            .unwrap_or_else(|| Value::from(done.last_insert_rowid()));
        tracing::info!(table = %meta.name, id = %id, "record created");
        Ok(merge_with_id(id, fields))
    }

    /// Partial update. The response echoes the input merged with the id; the row is not
    /// read back.
    pub async fn update(
        conn: &mut SqliteConnection,
        table: &str,
        id: &Value,
        fields: &Map<String, Value>,
    ) -> Result<Value, AppError> {
        let meta = describe_table(conn, table).await?;
        let pk = meta.require_primary_key()?;
        let q = sql::update(&meta, pk, id, fields)?;
        if !exec::exists(conn, &sql::select_exists(&meta, pk, id)).await? {
            return Err(AppError::record_not_found());
        }
        exec::execute(conn, &q).await?;
        tracing::info!(table = %meta.name, id = %id, "record updated");
        Ok(merge_with_id(id.clone(), fields))
    }

    /// Hard delete by primary key.
    pub async fn delete_by_id(conn: &mut SqliteConnection, table: &str, id: &Value) -> Result<(), AppError> {
        let meta = describe_table(conn, table).await?;
        let pk = meta.require_primary_key()?;
        if !exec::exists(conn, &sql::select_exists(&meta, pk, id)).await? {
            return Err(AppError::record_not_found());
        }
        exec::execute(conn, &sql::delete(&meta, pk, id)).await?;
        tracing::info!(table = %meta.name, id = %id, "record deleted");
        Ok(())
    }
}

/// `{id, ...fields}`; a field literally named `id` wins.
pub(crate) fn merge_with_id(id: Value, fields: &Map<String, Value>) -> Value {
    merge_with_key("id", id, fields)
}

pub(crate) fn merge_with_key(key: &str, id: Value, fields: &Map<String, Value>) -> Value {
    let mut out = Map::new();
    out.insert(key.to_string(), id);
    for (k, v) in fields {
        out.insert(k.clone(), v.clone());
    }
    Value::Object(out)
}
