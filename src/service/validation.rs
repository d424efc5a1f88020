//! Request validation. Everything here runs before any statement is sent.

use crate::error::AppError;
use crate::schema::TableMeta;
use serde_json::{Map, Value};

pub struct RequestValidator;

impl RequestValidator {
    /// Request bodies must be JSON objects.
    pub fn body_to_map(value: Value) -> Result<Map<String, Value>, AppError> {
        match value {
            Value::Object(m) => Ok(m),
            _ => Err(AppError::Validation("Le corps de la requête doit être un objet JSON".into())),
        }
    }

    /// Every not-null, default-less, non-key column must be a key of `body`.
    /// All missing columns are reported at once.
    pub fn validate_insert(table: &TableMeta, body: &Map<String, Value>) -> Result<(), AppError> {
        let missing: Vec<&str> = table
            .required_columns()
            .filter(|c| !body.contains_key(&c.name))
            .map(|c| c.name.as_str())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(format!("Colonnes manquantes: {}", missing.join(", "))))
        }
    }

    /// Fetch each named field, failing with `message` if any is absent or null.
    pub fn require_fields<'a, const N: usize>(
        body: &'a Map<String, Value>,
        names: [&str; N],
        message: &str,
    ) -> Result<[&'a Value; N], AppError> {
        let mut out = [&Value::Null; N];
        for (slot, name) in out.iter_mut().zip(names) {
            match body.get(name) {
                Some(v) if !v.is_null() => *slot = v,
                _ => return Err(AppError::Validation(message.to_string())),
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnMeta;
    use serde_json::json;

    fn table() -> TableMeta {
        let col = |name: &str, not_null: bool, pk: bool| ColumnMeta {
            name: name.into(),
            declared_type: "INTEGER".into(),
            not_null,
            default_value: None,
            primary_key: pk,
        };
        TableMeta {
            name: "TableDroits".into(),
            columns: vec![col("IdDroit", true, true), col("NomDroit", true, false), col("Code", true, false)],
        }
    }

    #[test]
    fn lists_every_missing_column() {
        let body = RequestValidator::body_to_map(json!({ "Autre": 1 })).unwrap();
        let err = RequestValidator::validate_insert(&table(), &body).unwrap_err();
        assert_eq!(err.to_string(), "Colonnes manquantes: NomDroit, Code");
    }

    #[test]
    fn presence_is_enough() {
        let body = RequestValidator::body_to_map(json!({ "NomDroit": "a", "Code": null })).unwrap();
        assert!(RequestValidator::validate_insert(&table(), &body).is_ok());
    }

    #[test]
    fn non_object_body_is_refused() {
        assert!(RequestValidator::body_to_map(json!([1, 2])).is_err());
    }

    #[test]
    fn require_fields_rejects_null_and_absent() {
        let body = RequestValidator::body_to_map(json!({ "a": 1, "b": null })).unwrap();
        let [a] = RequestValidator::require_fields(&body, ["a"], "msg").unwrap();
        assert_eq!(a, &json!(1));
        assert!(RequestValidator::require_fields(&body, ["a", "b"], "msg").is_err());
        assert!(RequestValidator::require_fields(&body, ["c"], "msg").is_err());
    }
}
