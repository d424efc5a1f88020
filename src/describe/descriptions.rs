//! Per-field UI descriptions, loaded once from the description table.

use crate::error::AppError;
use crate::schema::{describe_table, list_tables};
use crate::sql::{self, exec};
use serde::Serialize;
use serde_json::Value;
use sqlx::SqliteConnection;
use std::collections::HashMap;

const KEY_COLUMN: &str = "NomChamp";
const LABEL_COLUMN: &str = "Libelle";
const FILTERABLE_COLUMN: &str = "Filtrable";
const SCRUTABLE_COLUMN: &str = "Scrutable";
const EDITABLE_COLUMN: &str = "Modifiable";
const TYPE_COLUMN: &str = "TypeChamp";
const DEFAULT_COLUMN: &str = "ValeurDefaut";

pub const FALLBACK_LABEL: &str = "not found";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldDescription {
    pub label: String,
    pub filterable: bool,
    pub scrutable: bool,
    pub editable: bool,
    #[serde(rename = "type")]
    pub field_type: Option<String>,
    pub default_value: Option<Value>,
}

impl FieldDescription {
    /// Used for every field the description table does not mention.
    pub fn fallback() -> Self {
        FieldDescription {
            label: FALLBACK_LABEL.into(),
            filterable: true,
            scrutable: false,
            editable: true,
            field_type: None,
            default_value: None,
        }
    }
}

/// Read-only lookup keyed by `Table.Column`. Built before serving starts and shared
/// behind an `Arc`; a change in the description table needs a restart.
#[derive(Clone, Debug, Default)]
pub struct FieldDescriptions {
    by_field: HashMap<String, FieldDescription>,
}

impl FieldDescriptions {
    pub fn new(entries: impl IntoIterator<Item = (String, FieldDescription)>) -> Self {
        FieldDescriptions {
            by_field: entries
                .into_iter()
                .map(|(k, v)| (canonical_key(&k), v))
                .collect(),
        }
    }

    /// Load from `table`. A missing table yields an empty catalog: every lookup falls back.
    pub async fn load(conn: &mut SqliteConnection, table: &str) -> Result<Self, AppError> {
        if !list_tables(conn).await?.contains(table) {
            tracing::warn!(table = %table, "description table not found, using fallback descriptions");
            return Ok(Self::default());
        }
        let meta = describe_table(conn, table).await?;
        let rows = exec::fetch_all(conn, &sql::select_all(&meta)).await?;
        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let Some(key) = row.get(KEY_COLUMN).and_then(Value::as_str) else {
                continue;
            };
            let fallback = FieldDescription::fallback();
            entries.push((
                key.to_string(),
                FieldDescription {
                    label: row
                        .get(LABEL_COLUMN)
                        .and_then(Value::as_str)
                        .map(String::from)
                        .unwrap_or(fallback.label),
                    filterable: flag(row.get(FILTERABLE_COLUMN), fallback.filterable),
                    scrutable: flag(row.get(SCRUTABLE_COLUMN), fallback.scrutable),
                    editable: flag(row.get(EDITABLE_COLUMN), fallback.editable),
                    field_type: row.get(TYPE_COLUMN).and_then(Value::as_str).map(String::from),
                    default_value: row.get(DEFAULT_COLUMN).filter(|v| !v.is_null()).cloned(),
                },
            ));
        }
        let loaded = Self::new(entries);
        tracing::info!(table = %table, fields = loaded.len(), "field descriptions loaded");
        Ok(loaded)
    }

    /// Lookup by `Table.Column` or by the `Table..Column..` alias form.
    pub fn get(&self, field: &str) -> Option<&FieldDescription> {
        self.by_field.get(&canonical_key(field))
    }

    pub fn get_or_fallback(&self, field: &str) -> FieldDescription {
        self.get(field).cloned().unwrap_or_else(FieldDescription::fallback)
    }

    pub fn len(&self) -> usize {
        self.by_field.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_field.is_empty()
    }
}

/// `T..C..` → `T.C`; anything else is kept verbatim.
pub fn canonical_key(field: &str) -> String {
    if let Some(body) = field.strip_suffix("..") {
        if let Some((table, column)) = body.split_once("..") {
            return format!("{}.{}", table, column);
        }
    }
    field.to_string()
}

fn flag(v: Option<&Value>, default: bool) -> bool {
    match v {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(default),
        Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
            "1" | "true" | "oui" | "vrai" | "o" | "y" | "yes" => true,
            "0" | "false" | "non" | "faux" | "n" | "no" => false,
            _ => default,
        },
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn canonical_keys() {
        assert_eq!(canonical_key("TableX..ColY.."), "TableX.ColY");
        assert_eq!(canonical_key("TableX.ColY"), "TableX.ColY");
        assert_eq!(canonical_key("plain"), "plain");
    }

    #[test]
    fn unknown_field_gets_the_documented_fallback() {
        let d = FieldDescriptions::default();
        let got = d.get_or_fallback("TableX..ColY..");
        assert_eq!(got.label, "not found");
        assert!(got.filterable);
        assert!(got.editable);
        assert!(!got.scrutable);
        assert_eq!(got.field_type, None);
        assert_eq!(got.default_value, None);
    }

    #[test]
    fn both_key_forms_resolve() {
        let mut desc = FieldDescription::fallback();
        desc.label = "Nom".into();
        let d = FieldDescriptions::new([("TableProfils..NomProfil..".to_string(), desc.clone())]);
        assert_eq!(d.get("TableProfils.NomProfil"), Some(&desc));
        assert_eq!(d.get("TableProfils..NomProfil.."), Some(&desc));
    }

    #[test]
    fn flags_accept_sqlite_and_text_forms() {
        assert!(flag(Some(&json!(1)), false));
        assert!(!flag(Some(&json!(0)), true));
        assert!(flag(Some(&json!("Oui")), false));
        assert!(!flag(Some(&json!("non")), true));
        assert!(flag(None, true));
        assert!(!flag(Some(&json!(null)), false));
    }
}
