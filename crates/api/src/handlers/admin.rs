//! Administrative Benutzerverwaltung (Sperren und Entsperren)

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use rezeptbuch_db::Rolle;

use crate::{error::ApiResult, extract::AuthKontext, handlers::BenutzerAntwort, state::ApiState};

#[derive(Debug, Deserialize, Default)]
pub struct SperrenAnfrage {
    pub grund: Option<String>,
}

/// PUT /api/v1/admin/benutzer/:id/sperren
pub async fn sperren(
    State(state): State<ApiState>,
    kontext: AuthKontext,
    Path(id): Path<Uuid>,
    anfrage: Option<Json<SperrenAnfrage>>,
) -> ApiResult<Json<serde_json::Value>> {
    kontext.rolle_erfordern(Rolle::Admin)?;

    let grund = anfrage
        .and_then(|Json(a)| a.grund)
        .unwrap_or_else(|| "Gesperrt durch Administrator".to_string());

    let (benutzer, widerrufen) = state.sperren.sperren(id, &grund).await?;

    Ok(Json(json!({
        "benutzer": BenutzerAntwort::from(&benutzer),
        "widerrufeneSitzungen": widerrufen,
    })))
}

/// PUT /api/v1/admin/benutzer/:id/entsperren
pub async fn entsperren(
    State(state): State<ApiState>,
    kontext: AuthKontext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<BenutzerAntwort>> {
    kontext.rolle_erfordern(Rolle::Admin)?;

    let benutzer = state.sperren.entsperren(id).await?;
    Ok(Json(BenutzerAntwort::from(&benutzer)))
}

/// GET /api/v1/admin/benutzer/:id/sperrstatus
pub async fn sperrstatus(
    State(state): State<ApiState>,
    kontext: AuthKontext,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    kontext.rolle_erfordern(Rolle::Admin)?;

    let gesperrt = state.sperren.ist_gesperrt(id).await?;
    Ok(Json(json!({ "gesperrt": gesperrt })))
}
