//! Routen der API v1
//!
//! Der Autorisierungs-Filter liegt als Layer ueber allen Routen und
//! laeuft damit genau einmal pro Anfrage.

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_filter, server::health, state::ApiState};

/// Baut den Router der API samt Autorisierungs-Filter
pub fn api_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        // Authentifizierung
        .route("/api/v1/auth/registrieren", post(handlers::auth::registrieren))
        .route("/api/v1/auth/anmelden", post(handlers::auth::anmelden))
        .route("/api/v1/auth/abmelden", post(handlers::auth::abmelden))
        // Eigenes Konto
        .route("/api/v1/benutzer/mir", get(handlers::benutzer::mir))
        .route(
            "/api/v1/benutzer/mir/passwort",
            put(handlers::benutzer::passwort_aendern),
        )
        // Administration
        .route(
            "/api/v1/admin/benutzer/:id/sperren",
            put(handlers::admin::sperren),
        )
        .route(
            "/api/v1/admin/benutzer/:id/entsperren",
            put(handlers::admin::entsperren),
        )
        .route(
            "/api/v1/admin/benutzer/:id/sperrstatus",
            get(handlers::admin::sperrstatus),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_filter))
        .with_state(state)
}
