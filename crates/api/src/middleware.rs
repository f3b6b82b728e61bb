//! Autorisierungs-Filter
//!
//! Laeuft genau einmal pro Anfrage, vor dem Routing-Handler, und arbeitet
//! sechs Schritte ab:
//!
//! 1. Oeffentliche Routen passieren ungeprueft.
//! 2. Ohne `Authorization: Bearer ...` geht die Anfrage unauthentifiziert
//!    weiter; geschuetzte Handler lehnen sie dann ueber den Extractor ab.
//! 3. Offensichtlich kaputte Tokens (leer, "undefined", zu kurz) werden
//!    sofort mit einer strukturierten 401-Antwort beendet.
//! 4. Das Token wird dekodiert; Dekodierfehler beenden die Anfrage ebenfalls.
//! 5. Benutzer laden, Liveness und Signatur pruefen, AuthKontext ablegen.
//!    Scheitert ein Teilschritt, geht die Anfrage unauthentifiziert weiter.
//! 6. Weiter zum Handler.
//!
//! Die fruehen 401-Antworten tragen die CORS-Header von Hand, weil sie
//! den CORS-Layer des Routers nie erreichen.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;

use rezeptbuch_db::Rolle;

use crate::{extract::AuthKontext, state::ApiState};

/// Kuerzere Strings koennen strukturell kein signiertes Token sein
const MIN_TOKEN_LAENGE: usize = 20;

/// Strukturierter Koerper der fruehen 401-Antworten
///
/// `needsLogin` signalisiert Clients, dass eine neue Anmeldung noetig ist
/// statt eines stillen Retries.
#[derive(Debug, Serialize)]
struct FruehAbbruch {
    status: &'static str,
    code: u16,
    message: String,
    #[serde(rename = "needsLogin")]
    needs_login: bool,
    timestamp: String,
}

impl FruehAbbruch {
    fn unauthorisiert(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            code: StatusCode::UNAUTHORIZED.as_u16(),
            message: message.into(),
            needs_login: true,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Der Filter selbst, gedacht fuer `middleware::from_fn_with_state`
pub async fn auth_filter(
    State(state): State<ApiState>,
    mut anfrage: Request,
    next: Next,
) -> Response {
    // Schritt 1: oeffentliche Routen ueberspringen die Token-Pruefung komplett
    if ist_oeffentlich(anfrage.method(), anfrage.uri().path()) {
        return next.run(anfrage).await;
    }

    // Schritt 2: Bearer-Token extrahieren, sonst unauthentifiziert weiter
    let token = match bearer_token(&anfrage) {
        Some(t) => t.to_string(),
        None => return next.run(anfrage).await,
    };

    // Schritt 3: offensichtlich kaputte Tokens sofort beenden
    if token.is_empty() || token == "undefined" || token.len() < MIN_TOKEN_LAENGE {
        tracing::debug!(pfad = %anfrage.uri().path(), "Kaputtes Bearer-Token abgewiesen");
        return frueh_beenden(
            &state,
            &anfrage,
            FruehAbbruch::unauthorisiert("Token fehlt oder ist unbrauchbar"),
        );
    }

    // Schritt 4: Token dekodieren
    let subjekt = match state.codec.subjekt_extrahieren(&token) {
        Ok(s) => s,
        Err(e) => {
            tracing::debug!(pfad = %anfrage.uri().path(), fehler = %e, "Token-Dekodierung fehlgeschlagen");
            return frueh_beenden(&state, &anfrage, FruehAbbruch::unauthorisiert(e.to_string()));
        }
    };

    // Schritt 5: Benutzer laden, Liveness pruefen, Kontext ablegen.
    // Jeder Fehlschlag hier laesst die Anfrage unauthentifiziert weiterlaufen,
    // die Ablehnung uebernimmt dann der Extractor der geschuetzten Handler.
    if anfrage.extensions().get::<AuthKontext>().is_none() {
        match state.benutzer_repo.nach_email(&subjekt).await {
            Ok(Some(benutzer)) => {
                let live = state.token_store.ist_live(&token).await.unwrap_or(false);
                if live && state.codec.ist_gueltig(&token, &benutzer.email) {
                    let rolle = rollen_claim(&state, &token).unwrap_or(benutzer.rolle);
                    anfrage
                        .extensions_mut()
                        .insert(AuthKontext::neu(benutzer, rolle));
                } else {
                    tracing::warn!(subjekt = %subjekt, "Token nicht mehr live oder ungueltig");
                }
            }
            Ok(None) => {
                tracing::warn!(subjekt = %subjekt, "Token-Subjekt ohne Benutzerkonto");
            }
            Err(e) => {
                tracing::warn!(subjekt = %subjekt, fehler = %e, "Benutzer-Lookup im Filter fehlgeschlagen");
            }
        }
    }

    // Schritt 6: weiter zum Handler
    next.run(anfrage).await
}

/// Rollen-Schnappschuss aus dem Token-Claim
fn rollen_claim(state: &ApiState, token: &str) -> Option<Rolle> {
    let wert = state.codec.claim_extrahieren(token, "rolle").ok()?;
    Rolle::normalisieren(wert.as_str()?)
}

fn bearer_token(anfrage: &Request) -> Option<&str> {
    anfrage
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Baut die fruehe 401-Antwort samt CORS-Headern
fn frueh_beenden(state: &ApiState, anfrage: &Request, koerper: FruehAbbruch) -> Response {
    let mut antwort = (StatusCode::UNAUTHORIZED, Json(koerper)).into_response();

    let origin = anfrage
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok());
    cors_header_setzen(&mut antwort, &state.cors_origins, origin);

    antwort
}

/// Setzt die CORS-Header auf einer Antwort, die den Router-Layer umgeht
///
/// Spiegelt die Politik des Router-Layers: eine leere Origin-Liste
/// bedeutet Wildcard ohne Credentials, eine konfigurierte Liste erlaubt
/// nur gelistete Origins, dann mit Credentials.
fn cors_header_setzen(antwort: &mut Response<Body>, erlaubte: &[String], origin: Option<&str>) {
    let (allow_origin, credentials) = if erlaubte.is_empty() {
        ("*", false)
    } else {
        match origin {
            Some(o) if erlaubte.iter().any(|e| e == o) => (o, true),
            _ => return,
        }
    };

    let headers = antwort.headers_mut();
    if let Ok(wert) = HeaderValue::from_str(allow_origin) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, wert);
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, DELETE, PATCH, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("authorization, content-type"),
    );
    if credentials {
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
    }
}

/// Entscheidet ob eine Route ohne Token erreichbar ist
///
/// Schreibende Zugriffe auf Rezepte, Kommentare und Kategorien sind nie
/// oeffentlich; bei GET sind es die Lese-Endpunkte fuer anonyme Besucher.
/// `/api/v1/rezepte/ausstehend` ist trotz GET geschuetzt (Moderation),
/// deshalb zaehlt nur ein rein numerisches Segment als Rezept-ID.
fn ist_oeffentlich(methode: &Method, pfad: &str) -> bool {
    if pfad.starts_with("/api/v1/auth/")
        || pfad == "/health"
        || pfad == "/docs"
        || pfad.starts_with("/docs/")
    {
        return true;
    }

    if methode != Method::GET {
        return false;
    }

    if pfad == "/api/v1/rezepte"
        || pfad == "/api/v1/kategorien"
        || pfad.starts_with("/api/v1/rezepte/suche")
        || pfad.starts_with("/api/v1/rezepte/kategorie/")
        || pfad.starts_with("/api/v1/rezepte/benutzer/")
    {
        return true;
    }

    // GET /api/v1/rezepte/{id} und GET /api/v1/rezepte/{id}/kommentare
    if let Some(rest) = pfad.strip_prefix("/api/v1/rezepte/") {
        let mut teile = rest.split('/');
        let id = teile.next().unwrap_or("");
        let ist_numerisch = !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit());
        if ist_numerisch {
            return match teile.next() {
                None => true,
                Some("kommentare") => teile.next().is_none(),
                Some(_) => false,
            };
        }
        return false;
    }

    // GET /api/v1/kommentare/{id}
    if let Some(rest) = pfad.strip_prefix("/api/v1/kommentare/") {
        return !rest.is_empty() && !rest.contains('/');
    }

    false
}
