//! Fehleruebersetzung der API-Schicht
//!
//! Alle Fehler verlassen die API als JSON-Koerper der Form
//! `{"status":"error","code":<N>,"message":"..."}`. Die Zuordnung
//! AuthError -> Statuscode ist hier zentral, kein Handler baut eigene
//! Fehlerantworten.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use rezeptbuch_auth::AuthError;

/// Fehler der API-Schicht
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Geschuetzte Route ohne gueltige Anmeldung aufgerufen
    #[error("Anmeldung erforderlich")]
    AnmeldungErforderlich,

    /// Angemeldet, aber Rolle oder Berechtigung fehlt
    #[error("Zugriff verweigert: {0}")]
    ZugriffVerweigert(String),

    #[error("Ungueltige Eingabe: {0}")]
    UngueltigeEingabe(String),
}

impl ApiError {
    /// Statuscode und nach aussen sichtbare Meldung
    ///
    /// Unbekannte E-Mail und falsches Passwort liefern bewusst dieselbe
    /// Meldung; die Unterscheidung existiert nur in den Logs.
    fn status_und_meldung(&self) -> (StatusCode, String) {
        match self {
            ApiError::Auth(AuthError::UngueltigeAnmeldedaten)
            | ApiError::Auth(AuthError::BenutzerNichtGefunden(_)) => (
                StatusCode::UNAUTHORIZED,
                AuthError::UngueltigeAnmeldedaten.to_string(),
            ),
            ApiError::Auth(AuthError::TokenUngueltig(_)) => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            ApiError::Auth(AuthError::KontoGesperrt { .. }) => {
                (StatusCode::FORBIDDEN, self.to_string())
            }
            ApiError::Auth(AuthError::EmailVergeben(_)) => {
                (StatusCode::CONFLICT, self.to_string())
            }
            ApiError::Auth(
                AuthError::PasswortHashing(_)
                | AuthError::TokenKodierung(_)
                | AuthError::Datenbank(_)
                | AuthError::Intern(_),
            ) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Interner Serverfehler".to_string(),
            ),
            ApiError::AnmeldungErforderlich => (StatusCode::UNAUTHORIZED, self.to_string()),
            ApiError::ZugriffVerweigert(_) => (StatusCode::FORBIDDEN, self.to_string()),
            ApiError::UngueltigeEingabe(_) => (StatusCode::BAD_REQUEST, self.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, meldung) = self.status_und_meldung();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(fehler = %self, "Interner Fehler in der API");
        } else {
            tracing::debug!(fehler = %self, status = %status, "API-Fehlerantwort");
        }

        let koerper = json!({
            "status": "error",
            "code": status.as_u16(),
            "message": meldung,
        });
        (status, Json(koerper)).into_response()
    }
}

/// Result-Alias fuer Handler
pub type ApiResult<T> = Result<T, ApiError>;
