//! SQLite-Implementierung des BenutzerRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::DbError;
use crate::models::{BenutzerRecord, BenutzerUpdate, NeuerBenutzer, Rolle};
use crate::repository::{BenutzerRepository, DbResult};
use crate::sqlite::pool::SqliteDb;

#[async_trait]
impl BenutzerRepository for SqliteDb {
    async fn erstellen(&self, daten: NeuerBenutzer<'_>) -> DbResult<BenutzerRecord> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO benutzer (id, email, vorname, nachname, password_hash, rolle, gesperrt, created_at)
             VALUES (?, ?, ?, ?, ?, ?, 0, ?)",
        )
        .bind(id.to_string())
        .bind(daten.email)
        .bind(daten.vorname)
        .bind(daten.nachname)
        .bind(daten.password_hash)
        .bind(daten.rolle.als_str())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();
            if msg.contains("UNIQUE") || msg.contains("unique") {
                DbError::Eindeutigkeit(format!("E-Mail '{}' bereits registriert", daten.email))
            } else {
                DbError::Sqlx(e)
            }
        })?;

        Ok(BenutzerRecord {
            id,
            email: daten.email.to_string(),
            vorname: daten.vorname.to_string(),
            nachname: daten.nachname.to_string(),
            password_hash: daten.password_hash.to_string(),
            rolle: daten.rolle,
            gesperrt: false,
            sperrgrund: None,
            created_at: now,
            last_login: None,
        })
    }

    async fn nach_id(&self, id: Uuid) -> DbResult<Option<BenutzerRecord>> {
        let row = sqlx::query(
            "SELECT id, email, vorname, nachname, password_hash, rolle, gesperrt, sperrgrund, created_at, last_login
             FROM benutzer WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_zu_benutzer(&r)).transpose()
    }

    async fn nach_email(&self, email: &str) -> DbResult<Option<BenutzerRecord>> {
        let row = sqlx::query(
            "SELECT id, email, vorname, nachname, password_hash, rolle, gesperrt, sperrgrund, created_at, last_login
             FROM benutzer WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_zu_benutzer(&r)).transpose()
    }

    async fn aktualisieren(&self, id: Uuid, daten: BenutzerUpdate) -> DbResult<BenutzerRecord> {
        // Dynamisches UPDATE – nur gesetzte Felder aendern
        let mut sets: Vec<&str> = Vec::new();
        if daten.password_hash.is_some() {
            sets.push("password_hash = ?");
        }
        if daten.rolle.is_some() {
            sets.push("rolle = ?");
        }
        if daten.gesperrt.is_some() {
            sets.push("gesperrt = ?");
        }
        if daten.sperrgrund.is_some() {
            sets.push("sperrgrund = ?");
        }
        if daten.last_login.is_some() {
            sets.push("last_login = ?");
        }

        if sets.is_empty() {
            return self
                .nach_id(id)
                .await?
                .ok_or_else(|| DbError::nicht_gefunden(format!("Benutzer {id}")));
        }

        let sql = format!("UPDATE benutzer SET {} WHERE id = ?", sets.join(", "));
        let mut q = sqlx::query(&sql);

        if let Some(ref v) = daten.password_hash {
            q = q.bind(v);
        }
        if let Some(v) = daten.rolle {
            q = q.bind(v.als_str());
        }
        if let Some(v) = daten.gesperrt {
            q = q.bind(v as i64);
        }
        if let Some(ref v) = daten.sperrgrund {
            q = q.bind(v.as_deref());
        }
        if let Some(ref v) = daten.last_login {
            q = q.bind(v.to_rfc3339());
        }
        q = q.bind(id.to_string());

        let affected = q.execute(&self.pool).await?.rows_affected();
        if affected == 0 {
            return Err(DbError::nicht_gefunden(format!("Benutzer {id}")));
        }

        self.nach_id(id)
            .await?
            .ok_or_else(|| DbError::nicht_gefunden(format!("Benutzer {id}")))
    }

    async fn letzten_login_setzen(&self, id: Uuid) -> DbResult<()> {
        sqlx::query("UPDATE benutzer SET last_login = ? WHERE id = ?")
            .bind(Utc::now().to_rfc3339())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Wandelt eine SQLite-Row in einen BenutzerRecord um
fn row_zu_benutzer(row: &sqlx::sqlite::SqliteRow) -> DbResult<BenutzerRecord> {
    let id: String = row.try_get("id")?;
    let rolle: String = row.try_get("rolle")?;
    let created_at: String = row.try_get("created_at")?;
    let last_login: Option<String> = row.try_get("last_login")?;
    let gesperrt: i64 = row.try_get("gesperrt")?;

    Ok(BenutzerRecord {
        id: Uuid::from_str(&id).map_err(|e| DbError::UngueltigeDaten(e.to_string()))?,
        email: row.try_get("email")?,
        vorname: row.try_get("vorname")?,
        nachname: row.try_get("nachname")?,
        password_hash: row.try_get("password_hash")?,
        rolle: Rolle::normalisieren(&rolle)
            .ok_or_else(|| DbError::UngueltigeDaten(format!("Unbekannte Rolle: {rolle}")))?,
        gesperrt: gesperrt != 0,
        sperrgrund: row.try_get("sperrgrund")?,
        created_at: parse_zeit(&created_at)?,
        last_login: last_login.as_deref().map(parse_zeit).transpose()?,
    })
}

fn parse_zeit(s: &str) -> DbResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::UngueltigeDaten(format!("Ungueltiger Zeitstempel '{s}': {e}")))
}
