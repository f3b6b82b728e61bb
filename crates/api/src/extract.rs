//! AuthKontext: die Identitaet der aktuellen Anfrage
//!
//! Der Filter legt den Kontext als Request-Extension ab, Handler holen
//! ihn ueber den Extractor. Es gibt keinen ambienten globalen Zustand;
//! wer den Kontext braucht, nimmt ihn explizit als Parameter.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

use rezeptbuch_db::{BenutzerRecord, Rolle};

use crate::error::ApiError;

/// Authentifizierungskontext einer Anfrage
#[derive(Clone)]
pub struct AuthKontext {
    pub benutzer: BenutzerRecord,
    /// Effektive Rolle (aus dem Token-Claim, Fallback Kontostand)
    pub rolle: Rolle,
    pub berechtigungen: &'static [&'static str],
}

impl AuthKontext {
    pub fn neu(benutzer: BenutzerRecord, rolle: Rolle) -> Self {
        Self {
            benutzer,
            rolle,
            berechtigungen: rolle.berechtigungen(),
        }
    }

    pub fn hat_berechtigung(&self, schluessel: &str) -> bool {
        self.berechtigungen.contains(&schluessel)
    }

    /// Verlangt eine konkrete Rolle, sonst 403
    pub fn rolle_erfordern(&self, rolle: Rolle) -> Result<(), ApiError> {
        if self.rolle == rolle {
            Ok(())
        } else {
            Err(ApiError::ZugriffVerweigert(format!(
                "Rolle {} erforderlich",
                rolle.als_str()
            )))
        }
    }

    /// Verlangt eine Berechtigung, sonst 403
    pub fn berechtigung_erfordern(&self, schluessel: &str) -> Result<(), ApiError> {
        if self.hat_berechtigung(schluessel) {
            Ok(())
        } else {
            Err(ApiError::ZugriffVerweigert(format!(
                "Berechtigung '{schluessel}' erforderlich"
            )))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthKontext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthKontext>()
            .cloned()
            .ok_or(ApiError::AnmeldungErforderlich)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rezeptbuch_db::berechtigungen;
    use uuid::Uuid;

    fn kontext(rolle: Rolle) -> AuthKontext {
        AuthKontext::neu(
            BenutzerRecord {
                id: Uuid::new_v4(),
                email: "t@x.com".into(),
                vorname: "T".into(),
                nachname: "X".into(),
                password_hash: "$argon2id$platzhalter".into(),
                rolle,
                gesperrt: false,
                sperrgrund: None,
                created_at: Utc::now(),
                last_login: None,
            },
            rolle,
        )
    }

    #[test]
    fn admin_besteht_rollen_und_berechtigungs_pruefung() {
        let k = kontext(Rolle::Admin);
        assert!(k.rolle_erfordern(Rolle::Admin).is_ok());
        assert!(k.berechtigung_erfordern(berechtigungen::ADMIN_VERWALTEN).is_ok());
    }

    #[test]
    fn benutzer_scheitert_an_admin_anforderungen() {
        let k = kontext(Rolle::Benutzer);
        assert!(matches!(
            k.rolle_erfordern(Rolle::Admin),
            Err(ApiError::ZugriffVerweigert(_))
        ));
        assert!(matches!(
            k.berechtigung_erfordern(berechtigungen::ADMIN_VERWALTEN),
            Err(ApiError::ZugriffVerweigert(_))
        ));
        assert!(k.berechtigung_erfordern(berechtigungen::REZEPT_LESEN).is_ok());
    }
}
