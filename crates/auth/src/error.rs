//! Fehlertypen fuer die Auth-Services

use thiserror::Error;

/// Alle moeglichen Fehler in den Auth-Services
#[derive(Debug, Error)]
pub enum AuthError {
    // --- Passwort ---
    #[error("Passwort-Hashing fehlgeschlagen: {0}")]
    PasswortHashing(String),

    // --- Authentifizierung ---
    //
    // BenutzerNichtGefunden und UngueltigeAnmeldedaten werden nach aussen
    // auf dieselbe generische 401-Antwort abgebildet; die Unterscheidung
    // existiert nur fuer Logs.
    #[error("E-Mail oder Passwort falsch")]
    UngueltigeAnmeldedaten,

    #[error("Benutzer nicht gefunden: {0}")]
    BenutzerNichtGefunden(String),

    #[error("Konto gesperrt: {grund}")]
    KontoGesperrt { grund: String },

    // --- Registrierung ---
    #[error("E-Mail bereits registriert: {0}")]
    EmailVergeben(String),

    // --- Tokens ---
    #[error("Token ungueltig: {0}")]
    TokenUngueltig(String),

    #[error("Token-Kodierung fehlgeschlagen: {0}")]
    TokenKodierung(String),

    // --- Datenbank ---
    #[error("Datenbankfehler: {0}")]
    Datenbank(#[from] rezeptbuch_db::DbError),

    // --- Intern ---
    #[error("Interner Fehler: {0}")]
    Intern(String),
}

impl AuthError {
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }
}

/// Result-Alias fuer die Auth-Services
pub type AuthResult<T> = Result<T, AuthError>;
