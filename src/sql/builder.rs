//! Builds parameterized SELECT, INSERT, UPDATE, DELETE from introspected table metadata.
//!
//! Identifiers only ever come from a [`TableMeta`]; any name that is not a column of the
//! table is refused before a statement is produced. Values always travel as parameters.

use crate::error::AppError;
use crate::schema::{ColumnMeta, TableMeta};
use serde_json::{Map, Value};

/// Quote identifier for SQLite.
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// `T..C..`: the result-column alias that carries provenance through a flattened query.
pub fn qualified_alias(table: &str, column: &str) -> String {
    format!("{}..{}..", table, column)
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) {
        self.params.push(v);
    }
}

fn unknown_columns<'a>(table: &TableMeta, names: impl Iterator<Item = &'a str>) -> Result<(), AppError> {
    let unknown: Vec<&str> = names.filter(|n| !table.has_column(n)).collect();
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Colonnes inconnues pour {}: {}",
            table.name,
            unknown.join(", ")
        )))
    }
}

fn where_clause(q: &mut QueryBuf, prefix: Option<&str>, conditions: &[(&str, Value)]) -> String {
    if conditions.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = conditions
        .iter()
        .map(|(col, val)| {
            q.push_param(val.clone());
            match prefix {
                Some(p) => format!("{}.{} = ?", p, quoted(col)),
                None => format!("{} = ?", quoted(col)),
            }
        })
        .collect();
    format!(" WHERE {}", parts.join(" AND "))
}

/// SELECT every row, storage order.
pub fn select_all(table: &TableMeta) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT * FROM {}", quoted(&table.name));
    q
}

/// SELECT by primary key.
pub fn select_by_id(table: &TableMeta, pk: &ColumnMeta, id: &Value) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.push_param(id.clone());
    q.sql = format!("SELECT * FROM {} WHERE {} = ?", quoted(&table.name), quoted(&pk.name));
    q
}

/// Existence probe on the primary key.
pub fn select_exists(table: &TableMeta, pk: &ColumnMeta, id: &Value) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.push_param(id.clone());
    q.sql = format!("SELECT 1 FROM {} WHERE {} = ?", quoted(&table.name), quoted(&pk.name));
    q
}

/// SELECT * with exact-match conditions joined by AND.
pub fn select_where(table: &TableMeta, conditions: &[(&str, Value)]) -> Result<QueryBuf, AppError> {
    unknown_columns(table, conditions.iter().map(|(c, _)| *c))?;
    let mut q = QueryBuf::new();
    let clause = where_clause(&mut q, None, conditions);
    q.sql = format!("SELECT * FROM {}{}", quoted(&table.name), clause);
    Ok(q)
}

/// INSERT exactly the supplied fields, in catalog order. Columns absent from `fields`
/// are left to the database default.
pub fn insert(table: &TableMeta, fields: &Map<String, Value>) -> Result<QueryBuf, AppError> {
    unknown_columns(table, fields.keys().map(String::as_str))?;
    let mut q = QueryBuf::new();
    if fields.is_empty() {
        q.sql = format!("INSERT INTO {} DEFAULT VALUES", quoted(&table.name));
        return Ok(q);
    }
    let mut cols = Vec::new();
    for c in &table.columns {
        if let Some(v) = fields.get(&c.name) {
            q.push_param(v.clone());
            cols.push(quoted(&c.name));
        }
    }
    let placeholders = vec!["?"; cols.len()].join(", ");
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quoted(&table.name),
        cols.join(", "),
        placeholders
    );
    Ok(q)
}

/// UPDATE by id: SET only the supplied fields.
pub fn update(
    table: &TableMeta,
    pk: &ColumnMeta,
    id: &Value,
    fields: &Map<String, Value>,
) -> Result<QueryBuf, AppError> {
    unknown_columns(table, fields.keys().map(String::as_str))?;
    if fields.is_empty() {
        return Err(AppError::Validation("Aucune colonne à mettre à jour".into()));
    }
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for c in &table.columns {
        if let Some(v) = fields.get(&c.name) {
            q.push_param(v.clone());
            sets.push(format!("{} = ?", quoted(&c.name)));
        }
    }
    q.push_param(id.clone());
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ?",
        quoted(&table.name),
        sets.join(", "),
        quoted(&pk.name)
    );
    Ok(q)
}

/// UPDATE the rows matching every condition.
pub fn update_where(
    table: &TableMeta,
    fields: &Map<String, Value>,
    conditions: &[(&str, Value)],
) -> Result<QueryBuf, AppError> {
    unknown_columns(
        table,
        fields
            .keys()
            .map(String::as_str)
            .chain(conditions.iter().map(|(c, _)| *c)),
    )?;
    if fields.is_empty() {
        return Err(AppError::Validation("Aucune colonne à mettre à jour".into()));
    }
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for (k, v) in fields {
        q.push_param(v.clone());
        sets.push(format!("{} = ?", quoted(k)));
    }
    let clause = where_clause(&mut q, None, conditions);
    q.sql = format!("UPDATE {} SET {}{}", quoted(&table.name), sets.join(", "), clause);
    Ok(q)
}

/// DELETE by id.
pub fn delete(table: &TableMeta, pk: &ColumnMeta, id: &Value) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.push_param(id.clone());
    q.sql = format!("DELETE FROM {} WHERE {} = ?", quoted(&table.name), quoted(&pk.name));
    q
}

/// DELETE the rows matching every condition. At least one condition is required.
pub fn delete_where(table: &TableMeta, conditions: &[(&str, Value)]) -> Result<QueryBuf, AppError> {
    unknown_columns(table, conditions.iter().map(|(c, _)| *c))?;
    if conditions.is_empty() {
        return Err(AppError::InvalidState("Suppression sans condition refusée".into()));
    }
    let mut q = QueryBuf::new();
    let clause = where_clause(&mut q, None, conditions);
    q.sql = format!("DELETE FROM {}{}", quoted(&table.name), clause);
    Ok(q)
}

/// `"T"."C" AS "T..C.."` for every column of the table.
pub fn qualified_column_list(table: &TableMeta) -> Vec<String> {
    table
        .columns
        .iter()
        .map(|c| {
            format!(
                "{}.{} AS {}",
                quoted(&table.name),
                quoted(&c.name),
                quoted(&qualified_alias(&table.name, &c.name))
            )
        })
        .collect()
}

/// Full-row dump of one table with every column aliased `T..C..`.
pub fn select_qualified(table: &TableMeta) -> String {
    format!(
        "SELECT {} FROM {}",
        qualified_column_list(table).join(", "),
        quoted(&table.name)
    )
}

/// Full-row dump of `left` LEFT JOIN `right` on a column both tables share,
/// all columns aliased `T..C..`.
pub fn select_qualified_left_join(left: &TableMeta, right: &TableMeta, on: &str) -> Result<String, AppError> {
    unknown_columns(left, std::iter::once(on))?;
    unknown_columns(right, std::iter::once(on))?;
    let mut cols = qualified_column_list(left);
    cols.extend(qualified_column_list(right));
    Ok(format!(
        "SELECT {} FROM {} LEFT JOIN {} ON {}.{} = {}.{}",
        cols.join(", "),
        quoted(&left.name),
        quoted(&right.name),
        quoted(&left.name),
        quoted(on),
        quoted(&right.name),
        quoted(on)
    ))
}

/// SELECT one row by id, plus one field of the row it references through `ref_column`
/// (a self-reference: `ref_column` holds a primary-key value of the same table),
/// exposed under `alias`.
pub fn select_by_id_with_self_ref(
    table: &TableMeta,
    pk: &ColumnMeta,
    ref_column: &str,
    ref_field: &str,
    alias: &str,
    id: &Value,
) -> Result<QueryBuf, AppError> {
    unknown_columns(table, [ref_column, ref_field].into_iter())?;
    let mut q = QueryBuf::new();
    let t = quoted(&table.name);
    let clause = where_clause(&mut q, Some("main"), &[(pk.name.as_str(), id.clone())]);
    q.sql = format!(
        "SELECT main.*, origin.{} AS {} FROM {} main LEFT JOIN {} origin ON main.{} = origin.{}{}",
        quoted(ref_field),
        quoted(alias),
        t,
        t,
        quoted(ref_column),
        quoted(&pk.name),
        clause
    );
    Ok(q)
}

/// Rows of `target` linked to `owner_id` through the association table `link`:
/// `SELECT target.* FROM target JOIN link ON target.pk = link.target_ref WHERE link.owner_ref = ?`.
pub fn select_through(
    target: &TableMeta,
    target_pk: &ColumnMeta,
    link: &TableMeta,
    link_target_ref: &str,
    link_owner_ref: &str,
    owner_id: &Value,
) -> Result<QueryBuf, AppError> {
    unknown_columns(link, [link_target_ref, link_owner_ref].into_iter())?;
    let mut q = QueryBuf::new();
    let clause = where_clause(&mut q, Some("link"), &[(link_owner_ref, owner_id.clone())]);
    q.sql = format!(
        "SELECT target.* FROM {} target INNER JOIN {} link ON target.{} = link.{}{}",
        quoted(&target.name),
        quoted(&link.name),
        quoted(&target_pk.name),
        quoted(link_target_ref),
        clause
    );
    Ok(q)
}
