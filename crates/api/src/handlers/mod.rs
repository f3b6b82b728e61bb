//! Handler der API v1

pub mod admin;
pub mod auth;
pub mod benutzer;

use serde::Serialize;
use uuid::Uuid;

use rezeptbuch_db::BenutzerRecord;

/// Benutzer wie er nach aussen geht (ohne Passwort-Hash)
#[derive(Debug, Serialize)]
pub struct BenutzerAntwort {
    pub id: Uuid,
    pub email: String,
    pub vorname: String,
    pub nachname: String,
    pub rolle: &'static str,
    pub gesperrt: bool,
    pub sperrgrund: Option<String>,
}

impl From<&BenutzerRecord> for BenutzerAntwort {
    fn from(b: &BenutzerRecord) -> Self {
        Self {
            id: b.id,
            email: b.email.clone(),
            vorname: b.vorname.clone(),
            nachname: b.nachname.clone(),
            rolle: b.rolle.als_str(),
            gesperrt: b.gesperrt,
            sperrgrund: b.sperrgrund.clone(),
        }
    }
}
