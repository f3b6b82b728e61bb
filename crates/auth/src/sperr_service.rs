//! Sperr-Service: administrative Kontosperren
//!
//! Eine Sperre setzt das Sperr-Flag samt Grund am Konto und widerruft
//! sofort alle live Tokens des Benutzers. Die naechste Anfrage mit einem
//! alten Token scheitert damit an der Liveness-Pruefung des Filters.

use std::sync::Arc;

use uuid::Uuid;

use rezeptbuch_db::{BenutzerRecord, BenutzerRepository, BenutzerUpdate};

use crate::error::{AuthError, AuthResult};
use crate::logout::AbmeldeService;

/// Service fuer das Sperren und Entsperren von Benutzerkonten
pub struct SperrService {
    benutzer_repo: Arc<dyn BenutzerRepository>,
    abmelde_service: Arc<AbmeldeService>,
}

impl SperrService {
    pub fn neu(
        benutzer_repo: Arc<dyn BenutzerRepository>,
        abmelde_service: Arc<AbmeldeService>,
    ) -> Arc<Self> {
        Arc::new(Self {
            benutzer_repo,
            abmelde_service,
        })
    }

    /// Sperrt ein Konto und widerruft alle Sitzungen
    ///
    /// Gibt den aktualisierten Benutzer und die Anzahl widerrufener
    /// Tokens zurueck.
    pub async fn sperren(
        &self,
        user_id: Uuid,
        grund: &str,
    ) -> AuthResult<(BenutzerRecord, usize)> {
        let benutzer = self
            .benutzer_repo
            .aktualisieren(
                user_id,
                BenutzerUpdate {
                    gesperrt: Some(true),
                    sperrgrund: Some(Some(grund.to_string())),
                    ..Default::default()
                },
            )
            .await
            .map_err(|_| AuthError::BenutzerNichtGefunden(user_id.to_string()))?;

        let widerrufen = self.abmelde_service.alle_widerrufen(user_id).await?;

        tracing::info!(
            user_id = %user_id,
            grund = %grund,
            widerrufene_tokens = widerrufen,
            "Benutzer gesperrt"
        );

        Ok((benutzer, widerrufen))
    }

    /// Hebt eine Kontosperre auf
    pub async fn entsperren(&self, user_id: Uuid) -> AuthResult<BenutzerRecord> {
        let benutzer = self
            .benutzer_repo
            .aktualisieren(
                user_id,
                BenutzerUpdate {
                    gesperrt: Some(false),
                    sperrgrund: Some(None),
                    ..Default::default()
                },
            )
            .await
            .map_err(|_| AuthError::BenutzerNichtGefunden(user_id.to_string()))?;

        tracing::info!(user_id = %user_id, "Benutzer entsperrt");
        Ok(benutzer)
    }

    /// Prueft ob ein Konto aktuell gesperrt ist
    pub async fn ist_gesperrt(&self, user_id: Uuid) -> AuthResult<bool> {
        let benutzer = self
            .benutzer_repo
            .nach_id(user_id)
            .await?
            .ok_or_else(|| AuthError::BenutzerNichtGefunden(user_id.to_string()))?;
        Ok(benutzer.gesperrt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{InMemoryBenutzerRepo, InMemoryTokenRepo};
    use rezeptbuch_db::{NeuerBenutzer, NeuerToken, Rolle, TokenRepository};

    async fn aufbau() -> (Arc<SperrService>, Arc<InMemoryTokenRepo>, Uuid) {
        let benutzer_repo = Arc::new(InMemoryBenutzerRepo::default());
        let benutzer = benutzer_repo
            .erstellen(NeuerBenutzer {
                email: "ziel@x.com",
                vorname: "Ziel",
                nachname: "Person",
                password_hash: "$argon2id$platzhalter",
                rolle: Rolle::Benutzer,
            })
            .await
            .unwrap();

        let token_repo = Arc::new(InMemoryTokenRepo::default());
        token_repo
            .speichern(NeuerToken { token: "tok_live", user_id: benutzer.id })
            .await
            .unwrap();

        let abmelde = AbmeldeService::neu(token_repo.clone() as Arc<dyn TokenRepository>);
        let service = SperrService::neu(benutzer_repo, abmelde);
        (service, token_repo, benutzer.id)
    }

    #[tokio::test]
    async fn sperren_setzt_grund_und_widerruft() {
        let (service, token_repo, user_id) = aufbau().await;

        let (benutzer, widerrufen) = service.sperren(user_id, "Spam").await.unwrap();
        assert!(benutzer.gesperrt);
        assert_eq!(benutzer.sperrgrund.as_deref(), Some("Spam"));
        assert_eq!(widerrufen, 1);

        let token = token_repo.nach_wert("tok_live").await.unwrap().unwrap();
        assert!(!token.ist_live());
        assert!(service.ist_gesperrt(user_id).await.unwrap());
    }

    #[tokio::test]
    async fn entsperren_loescht_grund() {
        let (service, _, user_id) = aufbau().await;
        service.sperren(user_id, "Spam").await.unwrap();

        let benutzer = service.entsperren(user_id).await.unwrap();
        assert!(!benutzer.gesperrt);
        assert!(benutzer.sperrgrund.is_none());
        assert!(!service.ist_gesperrt(user_id).await.unwrap());
    }

    #[tokio::test]
    async fn unbekannter_benutzer_gibt_fehler() {
        let (service, _, _) = aufbau().await;
        let ergebnis = service.sperren(Uuid::new_v4(), "egal").await;
        assert!(matches!(ergebnis, Err(AuthError::BenutzerNichtGefunden(_))));
    }
}
