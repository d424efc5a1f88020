//! Domain routes: profile workflows, user closure and the sensor-console tables.
//! Static segments here take priority over the generic `/:table/:id` routes.

use super::common::method_not_allowed;
use crate::handlers::{capteur, profile};
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn profile_routes(state: AppState) -> Router {
    Router::new()
        .route("/profil/duplicate", post(profile::duplicate).fallback(method_not_allowed))
        .route("/profil/droits", put(profile::set_right).fallback(method_not_allowed))
        .route("/profil/suppression", put(profile::close_profile).fallback(method_not_allowed))
        .route("/profil/:id_profil/droits", get(profile::rights).fallback(method_not_allowed))
        .route("/Utilisateur/Cloture", put(profile::close_user).fallback(method_not_allowed))
        .with_state(state)
}

pub fn capteur_routes(state: AppState) -> Router {
    Router::new()
        .route("/Capteur/TableauUtilisateurs", get(capteur::users).fallback(method_not_allowed))
        .route("/Capteur/TableauOverloads", get(capteur::overloads).fallback(method_not_allowed))
        .route("/Capteur/TableauDroits", get(capteur::rights).fallback(method_not_allowed))
        .route("/Capteur/TableauCapteurs", get(capteur::sensors).fallback(method_not_allowed))
        .with_state(state)
}
