//! Catalog introspection: tables, columns and primary keys read from SQLite at call time.
//!
//! Nothing is cached. A [`TableMeta`] obtained through [`describe_table`] is the only
//! source of identifiers the statement builder accepts.

use crate::error::AppError;
use serde::Serialize;
use sqlx::SqliteConnection;
use std::collections::BTreeSet;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColumnMeta {
    pub name: String,
    #[serde(rename = "type")]
    pub declared_type: String,
    pub not_null: bool,
    pub default_value: Option<String>,
    pub primary_key: bool,
}

#[derive(Clone, Debug)]
pub struct TableMeta {
    pub name: String,
    pub columns: Vec<ColumnMeta>,
}

impl TableMeta {
    pub fn column(&self, name: &str) -> Option<&ColumnMeta> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Single-column primary key. Composite keys are refused rather than guessed.
    pub fn primary_key(&self) -> Result<Option<&ColumnMeta>, AppError> {
        let mut pks = self.columns.iter().filter(|c| c.primary_key);
        let first = pks.next();
        if pks.next().is_some() {
            return Err(AppError::InvalidState(format!(
                "Clé primaire composite non supportée pour la table {}",
                self.name
            )));
        }
        Ok(first)
    }

    /// Primary key or `InvalidState` when the table has none.
    pub fn require_primary_key(&self) -> Result<&ColumnMeta, AppError> {
        self.primary_key()?
            .ok_or_else(|| AppError::InvalidState("Clé primaire non trouvée".into()))
    }

    /// Columns an INSERT must supply: not null, no default, not the primary key.
    pub fn required_columns(&self) -> impl Iterator<Item = &ColumnMeta> {
        self.columns
            .iter()
            .filter(|c| c.not_null && c.default_value.is_none() && !c.primary_key)
    }
}

/// Names of user tables (views and sqlite internals excluded).
pub async fn list_tables(conn: &mut SqliteConnection) -> Result<BTreeSet<String>, AppError> {
    let names = sqlx::query_scalar::<_, String>(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
    )
    .fetch_all(&mut *conn)
    .await?;
    Ok(names.into_iter().collect())
}

/// Columns in catalog order. Empty when the table does not exist.
pub async fn list_columns(conn: &mut SqliteConnection, table: &str) -> Result<Vec<ColumnMeta>, AppError> {
    let rows = sqlx::query_as::<_, (i64, String, Option<String>, i64, Option<String>, i64)>(
        r#"SELECT cid, name, type, "notnull", dflt_value, pk FROM pragma_table_info(?1) ORDER BY cid"#,
    )
    .bind(table)
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows
        .into_iter()
        .map(|(_cid, name, declared_type, not_null, default_value, pk)| ColumnMeta {
            name,
            declared_type: declared_type.unwrap_or_default(),
            not_null: not_null != 0,
            default_value,
            primary_key: pk != 0,
        })
        .collect())
}

/// First column flagged as primary key, in catalog order.
pub async fn primary_key(conn: &mut SqliteConnection, table: &str) -> Result<Option<String>, AppError> {
    Ok(list_columns(conn, table)
        .await?
        .into_iter()
        .find(|c| c.primary_key)
        .map(|c| c.name))
}

/// Validate `table` against the catalog and load its columns.
pub async fn describe_table(conn: &mut SqliteConnection, table: &str) -> Result<TableMeta, AppError> {
    if !list_tables(conn).await?.contains(table) {
        return Err(AppError::table_not_found());
    }
    let columns = list_columns(conn, table).await?;
    Ok(TableMeta {
        name: table.to_string(),
        columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str, not_null: bool, default: Option<&str>, pk: bool) -> ColumnMeta {
        ColumnMeta {
            name: name.into(),
            declared_type: "TEXT".into(),
            not_null,
            default_value: default.map(String::from),
            primary_key: pk,
        }
    }

    #[test]
    fn required_columns_skip_key_defaults_and_nullable() {
        let t = TableMeta {
            name: "T".into(),
            columns: vec![
                col("Id", true, None, true),
                col("Nom", true, None, false),
                col("Actif", true, Some("1"), false),
                col("Note", false, None, false),
            ],
        };
        let req: Vec<_> = t.required_columns().map(|c| c.name.as_str()).collect();
        assert_eq!(req, vec!["Nom"]);
        assert_eq!(t.primary_key().unwrap().unwrap().name, "Id");
    }

    #[test]
    fn composite_key_is_refused() {
        let t = TableMeta {
            name: "T".into(),
            columns: vec![col("A", true, None, true), col("B", true, None, true)],
        };
        assert!(matches!(t.primary_key(), Err(AppError::InvalidState(_))));
    }

    #[test]
    fn missing_key_is_invalid_state() {
        let t = TableMeta {
            name: "T".into(),
            columns: vec![col("A", false, None, false)],
        };
        assert!(t.primary_key().unwrap().is_none());
        assert!(matches!(t.require_primary_key(), Err(AppError::InvalidState(_))));
    }
}
