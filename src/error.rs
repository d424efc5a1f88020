//! Typed errors and HTTP mapping.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("valeur invalide pour {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    InvalidState(String),
    #[error("{0}")]
    Internal(String),
    #[error("erreur base de données: {0}")]
    Db(#[from] sqlx::Error),
}

impl AppError {
    pub fn table_not_found() -> Self {
        AppError::NotFound("Table non trouvée".into())
    }

    pub fn record_not_found() -> Self {
        AppError::NotFound("Enregistrement non trouvé".into())
    }

    /// Wraps a failure raised inside a multi-statement workflow. Caller-facing
    /// categories survive; everything else becomes an internal error carrying
    /// the underlying message behind `context`.
    pub fn in_workflow(self, context: &str) -> Self {
        match self {
            AppError::NotFound(_)
            | AppError::Validation(_)
            | AppError::Conflict(_)
            | AppError::InvalidState(_) => self,
            other => AppError::Internal(format!("{}: {}", context, other)),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            // The rights endpoint reports an already-present association as 400.
            AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidState(_) => StatusCode::BAD_REQUEST,
            AppError::Db(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            AppError::Config(_) | AppError::Internal(_) | AppError::Db(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Corps JSON invalide: {}", rejection.body_text()))
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::info!(status = status.as_u16(), error = %self, "request rejected");
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_map_to_statuses() {
        assert_eq!(AppError::table_not_found().status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Conflict("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidState("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Db(sqlx::Error::PoolTimedOut).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn workflow_wrapping_keeps_client_errors() {
        let e = AppError::record_not_found().in_workflow("Erreur lors de la duplication du profil");
        assert!(matches!(e, AppError::NotFound(_)));

        let e = AppError::Db(sqlx::Error::PoolTimedOut).in_workflow("Erreur lors de la duplication du profil");
        match e {
            AppError::Internal(msg) => {
                assert!(msg.starts_with("Erreur lors de la duplication du profil: "));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn body_carries_message_only() {
        let body = ErrorBody {
            error: AppError::table_not_found().to_string(),
        };
        let v = serde_json::to_value(body).unwrap();
        assert_eq!(v, serde_json::json!({ "error": "Table non trouvée" }));
    }
}
