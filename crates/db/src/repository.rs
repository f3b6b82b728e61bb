//! Repository-Trait-Definitionen
//!
//! Das Repository-Pattern entkoppelt die Auth-Services von der konkreten
//! Datenbank-Implementierung. Die Traits sind objektsicher (`async_trait`),
//! damit sie hinter `Arc<dyn ...>` im Axum-State leben koennen.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DbError;
use crate::models::{BenutzerRecord, BenutzerUpdate, NeuerBenutzer, NeuerToken, TokenRecord};

/// Result-Alias fuer Repository-Operationen
pub type DbResult<T> = Result<T, DbError>;

/// Repository fuer Benutzer-Datenzugriffe
#[async_trait]
pub trait BenutzerRepository: Send + Sync {
    /// Einen neuen Benutzer anlegen
    async fn erstellen(&self, daten: NeuerBenutzer<'_>) -> DbResult<BenutzerRecord>;

    /// Einen Benutzer anhand seiner ID laden
    async fn nach_id(&self, id: Uuid) -> DbResult<Option<BenutzerRecord>>;

    /// Einen Benutzer anhand seiner E-Mail (dem Token-Subjekt) laden
    async fn nach_email(&self, email: &str) -> DbResult<Option<BenutzerRecord>>;

    /// Einen Benutzer aktualisieren – nur gesetzte Felder werden geaendert
    async fn aktualisieren(&self, id: Uuid, daten: BenutzerUpdate) -> DbResult<BenutzerRecord>;

    /// Zeitstempel des letzten Logins setzen
    async fn letzten_login_setzen(&self, id: Uuid) -> DbResult<()>;
}

/// Repository fuer Token-Datenzugriffe
///
/// Token-Eintraege sind ueber den Token-String eindeutig; `speichern`
/// verhaelt sich als Upsert auf diesem Schluessel.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Einen Token-Eintrag anlegen oder (anhand des Token-Strings) ersetzen
    async fn speichern(&self, daten: NeuerToken<'_>) -> DbResult<TokenRecord>;

    /// Punkt-Lookup anhand des Token-Strings
    async fn nach_wert(&self, token: &str) -> DbResult<Option<TokenRecord>>;

    /// Alle live Tokens (weder abgelaufen noch widerrufen) eines Benutzers
    async fn alle_live_fuer_benutzer(&self, user_id: Uuid) -> DbResult<Vec<TokenRecord>>;

    /// Beide Invalidierungs-Flags eines Tokens setzen
    ///
    /// Gibt `false` zurueck wenn kein Eintrag mit diesem String existiert.
    async fn invalidieren(&self, token: &str) -> DbResult<bool>;
}
