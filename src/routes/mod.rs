mod common;
mod domain;
mod tables;

pub use common::common_routes;
pub use domain::{capteur_routes, profile_routes};
pub use tables::table_routes;

use crate::config::Settings;
use crate::state::AppState;
use axum::Router;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Full application router: domain routes, generic table routes, root and fallback.
pub fn app(state: AppState, settings: &Settings) -> Router {
    Router::new()
        .merge(profile_routes(state.clone()))
        .merge(capteur_routes(state.clone()))
        .merge(table_routes(state.clone()))
        .merge(common_routes(state))
        .layer(RequestBodyLimitLayer::new(settings.body_limit_bytes))
        .layer(TraceLayer::new_for_http())
}
