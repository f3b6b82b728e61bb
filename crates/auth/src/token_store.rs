//! Token-Store: persistierte Buchfuehrung ueber ausgestellte Tokens
//!
//! Der Store ist das autoritative Liveness-Gate: ein Token das der Codec
//! strukturell akzeptiert kann hier trotzdem bereits widerrufen sein.
//! "Nicht gefunden" zaehlt als nicht-live – im Zweifel unauthentifiziert.

use std::sync::Arc;

use uuid::Uuid;

use rezeptbuch_db::{NeuerToken, TokenRecord, TokenRepository};

use crate::error::AuthResult;

/// Dienst-Fassade ueber dem TokenRepository
pub struct TokenStore {
    repo: Arc<dyn TokenRepository>,
}

impl TokenStore {
    pub fn neu(repo: Arc<dyn TokenRepository>) -> Arc<Self> {
        Arc::new(Self { repo })
    }

    /// Persistiert ein frisch ausgestelltes Token fuer den Benutzer
    pub async fn speichern(&self, token: &str, user_id: Uuid) -> AuthResult<TokenRecord> {
        let record = self.repo.speichern(NeuerToken { token, user_id }).await?;
        tracing::debug!(user_id = %user_id, "Token persistiert");
        Ok(record)
    }

    /// Punkt-Lookup anhand des Token-Strings
    pub async fn nach_wert(&self, token: &str) -> AuthResult<Option<TokenRecord>> {
        Ok(self.repo.nach_wert(token).await?)
    }

    /// Alle live Tokens eines Benutzers
    pub async fn alle_live_fuer_benutzer(&self, user_id: Uuid) -> AuthResult<Vec<TokenRecord>> {
        Ok(self.repo.alle_live_fuer_benutzer(user_id).await?)
    }

    /// Liveness-Pruefung: gefunden UND weder abgelaufen noch widerrufen
    pub async fn ist_live(&self, token: &str) -> AuthResult<bool> {
        Ok(self
            .repo
            .nach_wert(token)
            .await?
            .map(|r| r.ist_live())
            .unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::InMemoryTokenRepo;

    #[tokio::test]
    async fn unbekanntes_token_ist_nicht_live() {
        let store = TokenStore::neu(Arc::new(InMemoryTokenRepo::default()));
        assert!(!store.ist_live("nie_ausgestellt").await.unwrap());
    }

    #[tokio::test]
    async fn gespeichertes_token_ist_live() {
        let store = TokenStore::neu(Arc::new(InMemoryTokenRepo::default()));
        let user_id = Uuid::new_v4();

        store.speichern("tok_abc", user_id).await.unwrap();
        assert!(store.ist_live("tok_abc").await.unwrap());

        let record = store.nach_wert("tok_abc").await.unwrap().unwrap();
        assert_eq!(record.user_id, user_id);
    }

    #[tokio::test]
    async fn mehrere_live_tokens_pro_benutzer() {
        // Multi-Device: Anmeldung widerruft vorhandene Tokens nicht
        let store = TokenStore::neu(Arc::new(InMemoryTokenRepo::default()));
        let user_id = Uuid::new_v4();

        store.speichern("tok_1", user_id).await.unwrap();
        store.speichern("tok_2", user_id).await.unwrap();

        let live = store.alle_live_fuer_benutzer(user_id).await.unwrap();
        assert_eq!(live.len(), 2);
    }
}
