//! Execute a SELECT and annotate each result column with its field description.

use crate::describe::{FieldDescription, FieldDescriptions, ProvenanceResolver};
use crate::error::AppError;
use crate::sql::{bind_all, row_to_json};
use serde::Serialize;
use serde_json::Value;
use sqlx::{Column, Executor, SqliteConnection, Statement};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldDescriptor {
    /// Result-column name, verbatim.
    pub name: String,
    pub table: Option<String>,
    #[serde(flatten)]
    pub description: FieldDescription,
}

#[derive(Debug, Serialize)]
pub struct DescribedResult {
    pub metadata: Vec<FieldDescriptor>,
    pub data: Vec<Value>,
}

pub struct DescribedQuery<'a> {
    descriptions: &'a FieldDescriptions,
    resolver: &'a dyn ProvenanceResolver,
}

impl<'a> DescribedQuery<'a> {
    pub fn new(descriptions: &'a FieldDescriptions, resolver: &'a dyn ProvenanceResolver) -> Self {
        DescribedQuery {
            descriptions,
            resolver,
        }
    }

    /// Metadata for the given result columns, in order.
    pub fn describe_columns<S: AsRef<str>>(&self, sql: &str, columns: &[S]) -> Vec<FieldDescriptor> {
        let tables = self.resolver.source_tables(sql);
        columns
            .iter()
            .map(|c| {
                let name = c.as_ref();
                FieldDescriptor {
                    name: name.to_string(),
                    table: self.resolver.table_for(name, &tables).map(String::from),
                    description: self.descriptions.get_or_fallback(name),
                }
            })
            .collect()
    }

    /// Run `sql` with bound `params`. Columns come from the prepared statement, so an
    /// empty result still carries metadata.
    pub async fn run(
        &self,
        conn: &mut SqliteConnection,
        sql: &str,
        params: &[Value],
    ) -> Result<DescribedResult, AppError> {
        tracing::debug!(sql = %sql, params = ?params, "described query");
        let columns: Vec<String> = {
            let stmt = (&mut *conn).prepare(sql).await?;
            stmt.columns().iter().map(|c| c.name().to_string()).collect()
        };
        let rows = bind_all(sqlx::query(sql), params).fetch_all(&mut *conn).await?;
        Ok(DescribedResult {
            metadata: self.describe_columns(sql, &columns),
            data: rows.iter().map(row_to_json).collect(),
        })
    }
}
