//! Common routes: table listing at the root, JSON 404 and 405 fallbacks.

use crate::handlers::tables::root;
use crate::response::error_body;
use crate::state::AppState;
use axum::{http::StatusCode, routing::get, Json, Router};

async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::NOT_FOUND, Json(error_body("Route non trouvée")))
}

/// Method fallback for every route: known path, unserved method.
pub(crate) async fn method_not_allowed() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::METHOD_NOT_ALLOWED, Json(error_body("Méthode non autorisée")))
}

/// GET / plus the fallback for anything no other route matches.
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root).fallback(method_not_allowed))
        .fallback(not_found)
        .with_state(state)
}
