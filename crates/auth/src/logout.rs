//! Abmelde- und Widerrufs-Service
//!
//! Invalidiert einzelne Tokens (explizite Abmeldung) oder alle Tokens
//! eines Benutzers (administrative Sperre, Passwortwechsel). Tokens werden
//! weich invalidiert: beide Flags gesetzt, der Eintrag bleibt bestehen.

use std::sync::Arc;

use uuid::Uuid;

use rezeptbuch_db::TokenRepository;

use crate::error::AuthResult;

/// Service fuer Abmeldung und Token-Widerruf
pub struct AbmeldeService {
    token_repo: Arc<dyn TokenRepository>,
}

impl AbmeldeService {
    pub fn neu(token_repo: Arc<dyn TokenRepository>) -> Arc<Self> {
        Arc::new(Self { token_repo })
    }

    /// Meldet das uebergebene Token ab
    ///
    /// Kein Fehler wenn das Token unbekannt ist – eine Abmeldung mit
    /// fehlendem oder kaputtem Token ist ein No-op.
    pub async fn abmelden(&self, token: &str) -> AuthResult<()> {
        if self.token_repo.invalidieren(token).await? {
            tracing::debug!("Token abgemeldet und widerrufen");
        } else {
            tracing::debug!("Abmeldung ohne bekanntes Token (No-op)");
        }
        Ok(())
    }

    /// Widerruft alle live Tokens eines Benutzers
    ///
    /// Jeder Eintrag wird einzeln und dauerhaft invalidiert; ein Abbruch
    /// mitten in der Schleife laesst sich durch erneuten Aufruf nachholen
    /// (der Widerruf ist idempotent). Gibt die Anzahl widerrufener Tokens
    /// zurueck.
    pub async fn alle_widerrufen(&self, user_id: Uuid) -> AuthResult<usize> {
        let live = self.token_repo.alle_live_fuer_benutzer(user_id).await?;
        let mut anzahl = 0usize;
        for record in &live {
            if self.token_repo.invalidieren(&record.token).await? {
                anzahl += 1;
            }
        }

        if anzahl > 0 {
            tracing::info!(user_id = %user_id, anzahl, "Alle Benutzer-Tokens widerrufen");
        }
        Ok(anzahl)
    }
}
