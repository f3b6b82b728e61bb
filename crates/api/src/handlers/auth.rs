//! Handler fuer Registrierung, Anmeldung und Abmeldung

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use rezeptbuch_auth::Registrierung;

use crate::{
    error::{ApiError, ApiResult},
    handlers::BenutzerAntwort,
    state::ApiState,
};

#[derive(Debug, Deserialize)]
pub struct RegistrierenAnfrage {
    pub vorname: String,
    pub nachname: String,
    pub email: String,
    pub passwort: String,
}

#[derive(Debug, Deserialize)]
pub struct AnmeldenAnfrage {
    pub email: String,
    pub passwort: String,
}

/// POST /api/v1/auth/registrieren
pub async fn registrieren(
    State(state): State<ApiState>,
    Json(anfrage): Json<RegistrierenAnfrage>,
) -> ApiResult<impl IntoResponse> {
    if anfrage.email.trim().is_empty() || !anfrage.email.contains('@') {
        return Err(ApiError::UngueltigeEingabe(
            "E-Mail-Adresse fehlt oder ist ungueltig".into(),
        ));
    }
    if anfrage.passwort.len() < 8 {
        return Err(ApiError::UngueltigeEingabe(
            "Passwort muss mindestens 8 Zeichen haben".into(),
        ));
    }

    let (benutzer, token) = state
        .auth
        .registrieren(Registrierung {
            vorname: anfrage.vorname.trim(),
            nachname: anfrage.nachname.trim(),
            email: anfrage.email.trim(),
            passwort: &anfrage.passwort,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "token": token,
            "benutzer": BenutzerAntwort::from(&benutzer),
        })),
    ))
}

/// POST /api/v1/auth/anmelden
pub async fn anmelden(
    State(state): State<ApiState>,
    Json(anfrage): Json<AnmeldenAnfrage>,
) -> ApiResult<impl IntoResponse> {
    let (benutzer, token) = state.auth.anmelden(&anfrage.email, &anfrage.passwort).await?;

    Ok(Json(json!({
        "token": token,
        "benutzer": BenutzerAntwort::from(&benutzer),
    })))
}

/// POST /api/v1/auth/abmelden
///
/// Ohne oder mit unbekanntem Token ein No-op; die Antwort ist immer 204.
pub async fn abmelden(
    State(state): State<ApiState>,
    headers: HeaderMap,
) -> ApiResult<StatusCode> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if let Some(token) = token {
        state.abmelde.abmelden(token).await?;
    }

    Ok(StatusCode::NO_CONTENT)
}
