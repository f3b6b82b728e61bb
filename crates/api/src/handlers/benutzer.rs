//! Handler fuer das eigene Benutzerkonto

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::{
    error::{ApiError, ApiResult},
    extract::AuthKontext,
    handlers::BenutzerAntwort,
    state::ApiState,
};

/// GET /api/v1/benutzer/mir
pub async fn mir(kontext: AuthKontext) -> Json<BenutzerAntwort> {
    Json(BenutzerAntwort::from(&kontext.benutzer))
}

#[derive(Debug, Deserialize)]
pub struct PasswortAendernAnfrage {
    pub altes_passwort: String,
    pub neues_passwort: String,
}

/// PUT /api/v1/benutzer/mir/passwort
///
/// Verifiziert das alte Passwort und widerruft danach alle Sitzungen,
/// auch die gerade benutzte.
pub async fn passwort_aendern(
    State(state): State<ApiState>,
    kontext: AuthKontext,
    Json(anfrage): Json<PasswortAendernAnfrage>,
) -> ApiResult<StatusCode> {
    if anfrage.neues_passwort.len() < 8 {
        return Err(ApiError::UngueltigeEingabe(
            "Passwort muss mindestens 8 Zeichen haben".into(),
        ));
    }

    state
        .auth
        .passwort_aendern(
            kontext.benutzer.id,
            &anfrage.altes_passwort,
            &anfrage.neues_passwort,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
