//! SQLite-Implementierung des TokenRepository
//!
//! Token-Eintraege werden nie geloescht; Invalidierung setzt nur die
//! beiden Flags. `speichern` ersetzt einen vorhandenen Eintrag mit
//! demselben Token-String (Upsert auf dem eindeutigen Schluessel).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::DbError;
use crate::models::{NeuerToken, TokenRecord};
use crate::repository::{DbResult, TokenRepository};
use crate::sqlite::pool::SqliteDb;

#[async_trait]
impl TokenRepository for SqliteDb {
    async fn speichern(&self, daten: NeuerToken<'_>) -> DbResult<TokenRecord> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO tokens (id, token, user_id, abgelaufen, widerrufen, erstellt_am)
             VALUES (?, ?, ?, 0, 0, ?)
             ON CONFLICT(token) DO UPDATE SET abgelaufen = 0, widerrufen = 0",
        )
        .bind(id.to_string())
        .bind(daten.token)
        .bind(daten.user_id.to_string())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        self.nach_wert(daten.token)
            .await?
            .ok_or_else(|| DbError::intern("Token nach Upsert nicht auffindbar"))
    }

    async fn nach_wert(&self, token: &str) -> DbResult<Option<TokenRecord>> {
        let row = sqlx::query(
            "SELECT id, token, user_id, abgelaufen, widerrufen, erstellt_am
             FROM tokens WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| row_zu_token(&r)).transpose()
    }

    async fn alle_live_fuer_benutzer(&self, user_id: Uuid) -> DbResult<Vec<TokenRecord>> {
        let rows = sqlx::query(
            "SELECT id, token, user_id, abgelaufen, widerrufen, erstellt_am
             FROM tokens WHERE user_id = ? AND abgelaufen = 0 AND widerrufen = 0",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_zu_token).collect()
    }

    async fn invalidieren(&self, token: &str) -> DbResult<bool> {
        let affected = sqlx::query("UPDATE tokens SET abgelaufen = 1, widerrufen = 1 WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }
}

fn row_zu_token(row: &sqlx::sqlite::SqliteRow) -> DbResult<TokenRecord> {
    let id: String = row.try_get("id")?;
    let user_id: String = row.try_get("user_id")?;
    let abgelaufen: i64 = row.try_get("abgelaufen")?;
    let widerrufen: i64 = row.try_get("widerrufen")?;
    let erstellt_am: String = row.try_get("erstellt_am")?;

    Ok(TokenRecord {
        id: Uuid::from_str(&id).map_err(|e| DbError::UngueltigeDaten(e.to_string()))?,
        token: row.try_get("token")?,
        user_id: Uuid::from_str(&user_id).map_err(|e| DbError::UngueltigeDaten(e.to_string()))?,
        abgelaufen: abgelaufen != 0,
        widerrufen: widerrufen != 0,
        erstellt_am: DateTime::parse_from_rfc3339(&erstellt_am)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| DbError::UngueltigeDaten(format!("Ungueltiger Zeitstempel: {e}")))?,
    })
}
