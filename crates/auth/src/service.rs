//! Auth-Service fuer Rezeptbuch
//!
//! Zentraler Service fuer Registrierung, Anmeldung und Passwortwechsel.
//! Nutzt das Benutzer-Repository, den Token-Codec und den Token-Store.

use std::sync::Arc;

use chrono::Duration;
use uuid::Uuid;

use rezeptbuch_db::{BenutzerRecord, BenutzerRepository, BenutzerUpdate, NeuerBenutzer, Rolle};

use crate::{
    error::{AuthError, AuthResult},
    jwt::TokenCodec,
    logout::AbmeldeService,
    password::{passwort_hashen, passwort_verifizieren},
    token_store::TokenStore,
};

/// Eingabedaten fuer die Registrierung
#[derive(Debug, Clone)]
pub struct Registrierung<'a> {
    pub vorname: &'a str,
    pub nachname: &'a str,
    pub email: &'a str,
    pub passwort: &'a str,
}

/// Auth-Service – zentraler Einstiegspunkt fuer alle Authentifizierungsvorgaenge
pub struct AuthService {
    benutzer_repo: Arc<dyn BenutzerRepository>,
    token_store: Arc<TokenStore>,
    abmelde_service: Arc<AbmeldeService>,
    codec: Arc<TokenCodec>,
    token_ttl: Duration,
}

impl AuthService {
    pub fn neu(
        benutzer_repo: Arc<dyn BenutzerRepository>,
        token_store: Arc<TokenStore>,
        abmelde_service: Arc<AbmeldeService>,
        codec: Arc<TokenCodec>,
        token_ttl: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            benutzer_repo,
            token_store,
            abmelde_service,
            codec,
            token_ttl,
        })
    }

    /// Registriert einen neuen Benutzer und stellt direkt ein Token aus
    ///
    /// Die Eindeutigkeit der E-Mail wird hier im Service geprueft, nicht
    /// erst in der Datenbank.
    pub async fn registrieren(
        &self,
        daten: Registrierung<'_>,
    ) -> AuthResult<(BenutzerRecord, String)> {
        if self.benutzer_repo.nach_email(daten.email).await?.is_some() {
            return Err(AuthError::EmailVergeben(daten.email.to_string()));
        }

        let passwort_hash = passwort_hashen(daten.passwort)?;

        let benutzer = self
            .benutzer_repo
            .erstellen(NeuerBenutzer {
                email: daten.email,
                vorname: daten.vorname,
                nachname: daten.nachname,
                password_hash: &passwort_hash,
                rolle: Rolle::Benutzer,
            })
            .await?;

        let token = self.token_ausstellen(&benutzer).await?;

        tracing::info!(
            user_id = %benutzer.id,
            email = %benutzer.email,
            "Neuer Benutzer registriert"
        );

        Ok((benutzer, token))
    }

    /// Meldet einen Benutzer an und stellt ein neues Token aus
    ///
    /// Vorhandene Tokens bleiben gueltig (additives Multi-Session-Modell).
    /// Nach aussen ist die Antwort fuer "unbekannte E-Mail" und "falsches
    /// Passwort" identisch; nur die Logs unterscheiden die Faelle.
    pub async fn anmelden(
        &self,
        email: &str,
        passwort: &str,
    ) -> AuthResult<(BenutzerRecord, String)> {
        let benutzer = match self.benutzer_repo.nach_email(email).await? {
            Some(b) => b,
            None => {
                tracing::warn!(email = %email, "Login fuer unbekannte E-Mail");
                return Err(AuthError::UngueltigeAnmeldedaten);
            }
        };

        if !passwort_verifizieren(passwort, &benutzer.password_hash)? {
            tracing::warn!(email = %email, "Fehlgeschlagener Login-Versuch (Passwort)");
            return Err(AuthError::UngueltigeAnmeldedaten);
        }

        if benutzer.gesperrt {
            return Err(AuthError::KontoGesperrt {
                grund: benutzer
                    .sperrgrund
                    .clone()
                    .unwrap_or_else(|| "Konto gesperrt".to_string()),
            });
        }

        self.benutzer_repo.letzten_login_setzen(benutzer.id).await?;

        let token = self.token_ausstellen(&benutzer).await?;

        tracing::info!(
            user_id = %benutzer.id,
            email = %benutzer.email,
            "Benutzer angemeldet"
        );

        Ok((benutzer, token))
    }

    /// Aendert das Passwort eines Benutzers
    ///
    /// Erfordert das alte Passwort zur Verifikation und widerruft
    /// anschliessend alle live Tokens des Benutzers.
    pub async fn passwort_aendern(
        &self,
        user_id: Uuid,
        altes_passwort: &str,
        neues_passwort: &str,
    ) -> AuthResult<()> {
        let benutzer = self
            .benutzer_repo
            .nach_id(user_id)
            .await?
            .ok_or_else(|| AuthError::BenutzerNichtGefunden(user_id.to_string()))?;

        if !passwort_verifizieren(altes_passwort, &benutzer.password_hash)? {
            return Err(AuthError::UngueltigeAnmeldedaten);
        }

        let neuer_hash = passwort_hashen(neues_passwort)?;
        self.benutzer_repo
            .aktualisieren(
                user_id,
                BenutzerUpdate {
                    password_hash: Some(neuer_hash),
                    ..Default::default()
                },
            )
            .await?;

        let anzahl = self.abmelde_service.alle_widerrufen(user_id).await?;
        tracing::info!(
            user_id = %user_id,
            widerrufene_tokens = anzahl,
            "Passwort geaendert, Tokens widerrufen"
        );

        Ok(())
    }

    /// Stellt ein Token aus und persistiert es im Token-Store
    async fn token_ausstellen(&self, benutzer: &BenutzerRecord) -> AuthResult<String> {
        let token = self
            .codec
            .erstellen(&benutzer.email, benutzer.rolle, self.token_ttl)?;
        self.token_store.speichern(&token, benutzer.id).await?;
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{InMemoryBenutzerRepo, InMemoryTokenRepo};
    use rezeptbuch_db::TokenRepository;

    fn test_service() -> (Arc<AuthService>, Arc<TokenStore>) {
        let benutzer_repo = Arc::new(InMemoryBenutzerRepo::default());
        let token_repo: Arc<dyn TokenRepository> = Arc::new(InMemoryTokenRepo::default());
        let token_store = TokenStore::neu(Arc::clone(&token_repo));
        let abmelde = AbmeldeService::neu(token_repo);
        let codec = Arc::new(TokenCodec::neu("unit-test-geheimnis"));
        let service = AuthService::neu(
            benutzer_repo,
            Arc::clone(&token_store),
            abmelde,
            codec,
            Duration::hours(1),
        );
        (service, token_store)
    }

    fn registrierung<'a>(email: &'a str) -> Registrierung<'a> {
        Registrierung {
            vorname: "Anna",
            nachname: "Test",
            email,
            passwort: "pw123456",
        }
    }

    #[tokio::test]
    async fn registrieren_und_anmelden() {
        let (service, store) = test_service();

        let (benutzer, token) = service.registrieren(registrierung("a@x.com")).await.unwrap();
        assert_eq!(benutzer.email, "a@x.com");
        assert_eq!(benutzer.rolle, Rolle::Benutzer);
        assert!(store.ist_live(&token).await.unwrap());

        let (_, token2) = service.anmelden("a@x.com", "pw123456").await.unwrap();
        assert_ne!(token, token2);
        // Multi-Session: das erste Token bleibt gueltig
        assert!(store.ist_live(&token).await.unwrap());
        assert!(store.ist_live(&token2).await.unwrap());
    }

    #[tokio::test]
    async fn doppelte_registrierung_schlaegt_fehl() {
        let (service, _) = test_service();
        service.registrieren(registrierung("dup@x.com")).await.unwrap();

        let ergebnis = service.registrieren(registrierung("dup@x.com")).await;
        assert!(matches!(ergebnis, Err(AuthError::EmailVergeben(_))));
    }

    #[tokio::test]
    async fn falsches_passwort_und_unbekannte_email_identisch() {
        let (service, _) = test_service();
        service.registrieren(registrierung("u@x.com")).await.unwrap();

        let falsch = service.anmelden("u@x.com", "falsch").await.unwrap_err();
        let fehlt = service.anmelden("fehlt@x.com", "egal").await.unwrap_err();

        // Keine Benutzer-Enumeration: beide Faelle liefern dieselbe Meldung
        assert_eq!(falsch.to_string(), fehlt.to_string());
        assert!(matches!(falsch, AuthError::UngueltigeAnmeldedaten));
        assert!(matches!(fehlt, AuthError::UngueltigeAnmeldedaten));
    }

    #[tokio::test]
    async fn gesperrtes_konto_wird_abgewiesen() {
        let (service, _) = test_service();
        let (benutzer, _) = service.registrieren(registrierung("bann@x.com")).await.unwrap();

        // Sperre direkt ueber das Repository setzen
        service
            .benutzer_repo
            .aktualisieren(
                benutzer.id,
                BenutzerUpdate {
                    gesperrt: Some(true),
                    sperrgrund: Some(Some("Spam".into())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let ergebnis = service.anmelden("bann@x.com", "pw123456").await;
        match ergebnis {
            Err(AuthError::KontoGesperrt { grund }) => assert_eq!(grund, "Spam"),
            andere => panic!("erwartet KontoGesperrt, war: {andere:?}"),
        }
    }

    #[tokio::test]
    async fn passwort_aendern_widerruft_tokens() {
        let (service, store) = test_service();
        let (benutzer, token) = service.registrieren(registrierung("pw@x.com")).await.unwrap();

        service
            .passwort_aendern(benutzer.id, "pw123456", "neues_pw99")
            .await
            .unwrap();

        assert!(!store.ist_live(&token).await.unwrap());
        assert!(service.anmelden("pw@x.com", "pw123456").await.is_err());
        service.anmelden("pw@x.com", "neues_pw99").await.unwrap();
    }
}
