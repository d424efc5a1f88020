//! Generic table routes. The table name is a path segment, validated against the catalog
//! by the handlers.

use super::common::method_not_allowed;
use crate::handlers::tables::{create, delete as delete_handler, list, read, structure, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn table_routes(state: AppState) -> Router {
    Router::new()
        .route("/:table", get(list).post(create).fallback(method_not_allowed))
        .route("/:table/structure", get(structure).fallback(method_not_allowed))
        .route(
            "/:table/:id",
            get(read).put(update).delete(delete_handler).fallback(method_not_allowed),
        )
        .with_state(state)
}
