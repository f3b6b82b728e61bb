//! rezeptbuch-server – Bibliotheks-Root
//!
//! Verdrahtet Datenbank, Auth-Services und REST-API und stellt den
//! oeffentlichen Einstiegspunkt fuer Integrationstests bereit.

pub mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Duration;

use config::{ServerConfig, ENTWICKLUNGS_GEHEIMNIS};
use rezeptbuch_api::{ApiState, RestServer, RestServerKonfig};
use rezeptbuch_auth::{
    passwort_hashen, AbmeldeService, AuthService, SperrService, TokenCodec, TokenStore,
};
use rezeptbuch_db::{BenutzerRepository, NeuerBenutzer, Rolle, SqliteDb, TokenRepository};

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Startet alle Subsysteme und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Datenbank oeffnen und migrieren
    /// 2. Auth-Services verdrahten
    /// 3. Optionales Admin-Konto anlegen
    /// 4. REST-API starten
    /// 5. Auf Ctrl-C warten
    pub async fn starten(self) -> Result<()> {
        tracing::info!(
            server_name = %self.config.server.name,
            api = %self.config.api_bind_adresse(),
            "Server startet"
        );

        if self.config.token.geheimnis == ENTWICKLUNGS_GEHEIMNIS {
            tracing::warn!(
                "Token-Geheimnis ist der Entwicklungs-Platzhalter; fuer Produktion [token].geheimnis setzen"
            );
        }

        let db = Arc::new(
            SqliteDb::oeffnen(
                &self.config.datenbank.url,
                self.config.datenbank.max_verbindungen,
            )
            .await?,
        );
        let benutzer_repo: Arc<dyn BenutzerRepository> = db.clone();
        let token_repo: Arc<dyn TokenRepository> = db;

        let token_store = TokenStore::neu(Arc::clone(&token_repo));
        let abmelde = AbmeldeService::neu(token_repo);
        let sperren = SperrService::neu(Arc::clone(&benutzer_repo), Arc::clone(&abmelde));
        let codec = Arc::new(TokenCodec::neu(&self.config.token.geheimnis));
        let auth = AuthService::neu(
            Arc::clone(&benutzer_repo),
            Arc::clone(&token_store),
            Arc::clone(&abmelde),
            Arc::clone(&codec),
            Duration::hours(self.config.token.ttl_stunden),
        );

        admin_konto_anlegen(&self.config, benutzer_repo.as_ref()).await?;

        let state = ApiState::neu(
            auth,
            abmelde,
            sperren,
            token_store,
            codec,
            benutzer_repo,
            self.config.cors.origins.clone(),
        );

        let rest = RestServer::neu(RestServerKonfig {
            bind_adresse: self
                .config
                .api_bind_adresse()
                .parse()
                .context("Ungueltige API-Bind-Adresse")?,
            cors_origins: self.config.cors.origins.clone(),
        });

        tokio::select! {
            ergebnis = rest.starten(state) => ergebnis,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown-Signal empfangen, Server wird beendet");
                Ok(())
            }
        }
    }
}

/// Legt das konfigurierte Admin-Konto an, falls es noch nicht existiert
async fn admin_konto_anlegen(
    config: &ServerConfig,
    benutzer_repo: &dyn BenutzerRepository,
) -> Result<()> {
    let (email, passwort) = match (&config.admin.email, &config.admin.passwort) {
        (Some(email), Some(passwort)) => (email, passwort),
        _ => return Ok(()),
    };

    if benutzer_repo.nach_email(email).await?.is_some() {
        return Ok(());
    }

    let hash = passwort_hashen(passwort).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let admin = benutzer_repo
        .erstellen(NeuerBenutzer {
            email,
            vorname: "Admin",
            nachname: "Rezeptbuch",
            password_hash: &hash,
            rolle: Rolle::Admin,
        })
        .await?;

    tracing::info!(user_id = %admin.id, email = %email, "Admin-Konto angelegt");
    Ok(())
}
