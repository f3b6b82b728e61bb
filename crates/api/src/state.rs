//! Geteilter Zustand der API-Schicht

use std::sync::Arc;

use rezeptbuch_auth::{AbmeldeService, AuthService, SperrService, TokenCodec, TokenStore};
use rezeptbuch_db::BenutzerRepository;

/// Zustand der an alle Handler und den Filter gereicht wird
///
/// Alle Felder sind Arc-geteilt; `Clone` ist billig und pro Anfrage noetig.
#[derive(Clone)]
pub struct ApiState {
    pub auth: Arc<AuthService>,
    pub abmelde: Arc<AbmeldeService>,
    pub sperren: Arc<SperrService>,
    pub token_store: Arc<TokenStore>,
    pub codec: Arc<TokenCodec>,
    pub benutzer_repo: Arc<dyn BenutzerRepository>,
    /// Erlaubte CORS-Origins (leer = alle erlauben)
    pub cors_origins: Arc<Vec<String>>,
}

impl ApiState {
    pub fn neu(
        auth: Arc<AuthService>,
        abmelde: Arc<AbmeldeService>,
        sperren: Arc<SperrService>,
        token_store: Arc<TokenStore>,
        codec: Arc<TokenCodec>,
        benutzer_repo: Arc<dyn BenutzerRepository>,
        cors_origins: Vec<String>,
    ) -> Self {
        Self {
            auth,
            abmelde,
            sperren,
            token_store,
            codec,
            benutzer_repo,
            cors_origins: Arc::new(cors_origins),
        }
    }
}
