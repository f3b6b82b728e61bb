//! In-Memory-Repositories fuer die Unit-Tests dieses Crates

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use rezeptbuch_db::{
    BenutzerRecord, BenutzerRepository, BenutzerUpdate, DbError, NeuerBenutzer, NeuerToken,
    TokenRecord, TokenRepository,
};
use rezeptbuch_db::repository::DbResult;

/// Minimales In-Memory BenutzerRepository
#[derive(Default)]
pub struct InMemoryBenutzerRepo {
    pub benutzer: Mutex<Vec<BenutzerRecord>>,
}

#[async_trait]
impl BenutzerRepository for InMemoryBenutzerRepo {
    async fn erstellen(&self, daten: NeuerBenutzer<'_>) -> DbResult<BenutzerRecord> {
        let mut benutzer = self.benutzer.lock().unwrap();
        if benutzer.iter().any(|b| b.email == daten.email) {
            return Err(DbError::Eindeutigkeit(format!(
                "E-Mail '{}' bereits registriert",
                daten.email
            )));
        }
        let record = BenutzerRecord {
            id: Uuid::new_v4(),
            email: daten.email.to_string(),
            vorname: daten.vorname.to_string(),
            nachname: daten.nachname.to_string(),
            password_hash: daten.password_hash.to_string(),
            rolle: daten.rolle,
            gesperrt: false,
            sperrgrund: None,
            created_at: Utc::now(),
            last_login: None,
        };
        benutzer.push(record.clone());
        Ok(record)
    }

    async fn nach_id(&self, id: Uuid) -> DbResult<Option<BenutzerRecord>> {
        Ok(self.benutzer.lock().unwrap().iter().find(|b| b.id == id).cloned())
    }

    async fn nach_email(&self, email: &str) -> DbResult<Option<BenutzerRecord>> {
        Ok(self
            .benutzer
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.email == email)
            .cloned())
    }

    async fn aktualisieren(&self, id: Uuid, daten: BenutzerUpdate) -> DbResult<BenutzerRecord> {
        let mut benutzer = self.benutzer.lock().unwrap();
        let eintrag = benutzer
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| DbError::nicht_gefunden(id.to_string()))?;
        if let Some(hash) = daten.password_hash {
            eintrag.password_hash = hash;
        }
        if let Some(rolle) = daten.rolle {
            eintrag.rolle = rolle;
        }
        if let Some(gesperrt) = daten.gesperrt {
            eintrag.gesperrt = gesperrt;
        }
        if let Some(grund) = daten.sperrgrund {
            eintrag.sperrgrund = grund;
        }
        if let Some(login) = daten.last_login {
            eintrag.last_login = Some(login);
        }
        Ok(eintrag.clone())
    }

    async fn letzten_login_setzen(&self, id: Uuid) -> DbResult<()> {
        let mut benutzer = self.benutzer.lock().unwrap();
        if let Some(eintrag) = benutzer.iter_mut().find(|b| b.id == id) {
            eintrag.last_login = Some(Utc::now());
        }
        Ok(())
    }
}

/// Minimales In-Memory TokenRepository
#[derive(Default)]
pub struct InMemoryTokenRepo {
    pub tokens: Mutex<Vec<TokenRecord>>,
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepo {
    async fn speichern(&self, daten: NeuerToken<'_>) -> DbResult<TokenRecord> {
        let mut tokens = self.tokens.lock().unwrap();
        tokens.retain(|t| t.token != daten.token);
        let record = TokenRecord {
            id: Uuid::new_v4(),
            token: daten.token.to_string(),
            user_id: daten.user_id,
            abgelaufen: false,
            widerrufen: false,
            erstellt_am: Utc::now(),
        };
        tokens.push(record.clone());
        Ok(record)
    }

    async fn nach_wert(&self, token: &str) -> DbResult<Option<TokenRecord>> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.token == token)
            .cloned())
    }

    async fn alle_live_fuer_benutzer(&self, user_id: Uuid) -> DbResult<Vec<TokenRecord>> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == user_id && t.ist_live())
            .cloned()
            .collect())
    }

    async fn invalidieren(&self, token: &str) -> DbResult<bool> {
        let mut tokens = self.tokens.lock().unwrap();
        match tokens.iter_mut().find(|t| t.token == token) {
            Some(eintrag) => {
                eintrag.abgelaufen = true;
                eintrag.widerrufen = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
