//! Token-Codec: signierte JWTs mit Subjekt-, Rollen- und Ablauf-Claims
//!
//! Der Codec prueft nur kryptografische und strukturelle Gueltigkeit.
//! Ob ein Token noch live ist (nicht widerrufen) entscheidet allein der
//! [`TokenStore`](crate::token_store::TokenStore); der Rollen-Claim ist
//! ein Schnappschuss vom Ausstellungszeitpunkt.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use rezeptbuch_db::Rolle;

use crate::error::{AuthError, AuthResult};

/// Claims eines ausgestellten Tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subjekt: die E-Mail-Adresse des Benutzers
    pub sub: String,
    /// Rollen-Schnappschuss vom Ausstellungszeitpunkt
    pub rolle: String,
    /// Ausgestellt am (Unix-Sekunden)
    pub iat: u64,
    /// Laeuft ab am (Unix-Sekunden)
    pub exp: u64,
}

/// Codec fuer das Ausstellen und Pruefen signierter Tokens (HS256)
///
/// Das Geheimnis kommt aus der Server-Konfiguration und steht nie im Code.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenCodec {
    pub fn neu(geheimnis: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(geheimnis.as_bytes()),
            decoding_key: DecodingKey::from_secret(geheimnis.as_bytes()),
        }
    }

    fn validierung() -> Validation {
        let mut v = Validation::new(Algorithm::HS256);
        // Ablauf wird gegen die Wanduhr geprueft, ohne Toleranz.
        // Uhren-Schiefstand wird bewusst nicht kompensiert.
        v.leeway = 0;
        v
    }

    /// Stellt ein signiertes Token fuer das Subjekt aus
    pub fn erstellen(&self, subjekt: &str, rolle: Rolle, ttl: Duration) -> AuthResult<String> {
        let jetzt = Utc::now();
        let claims = Claims {
            sub: subjekt.to_string(),
            rolle: rolle.als_str().to_string(),
            iat: jetzt.timestamp().max(0) as u64,
            exp: (jetzt + ttl).timestamp().max(0) as u64,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::TokenKodierung(e.to_string()))
    }

    /// Dekodiert und prueft alle Claims eines Tokens
    ///
    /// Schlaegt mit `TokenUngueltig` fehl bei falscher Signatur,
    /// kaputter Struktur, fehlenden Claims oder abgelaufenem Token.
    pub fn claims_extrahieren(&self, token: &str) -> AuthResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &Self::validierung())
            .map(|daten| daten.claims)
            .map_err(|e| AuthError::TokenUngueltig(e.to_string()))
    }

    /// Extrahiert das Subjekt (die E-Mail) aus einem Token
    pub fn subjekt_extrahieren(&self, token: &str) -> AuthResult<String> {
        Ok(self.claims_extrahieren(token)?.sub)
    }

    /// Generischer Claim-Zugriff ueber den Claim-Namen
    pub fn claim_extrahieren(&self, token: &str, name: &str) -> AuthResult<serde_json::Value> {
        let wert = decode::<serde_json::Value>(token, &self.decoding_key, &Self::validierung())
            .map_err(|e| AuthError::TokenUngueltig(e.to_string()))?;
        wert.claims
            .get(name)
            .cloned()
            .ok_or_else(|| AuthError::TokenUngueltig(format!("Claim '{name}' fehlt")))
    }

    /// Strukturelle Gueltigkeit: Signatur ok, Subjekt passt, nicht abgelaufen
    pub fn ist_gueltig(&self, token: &str, erwartetes_subjekt: &str) -> bool {
        match self.claims_extrahieren(token) {
            Ok(claims) => claims.sub == erwartetes_subjekt,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::neu("test-geheimnis-mit-genug-laenge")
    }

    #[test]
    fn subjekt_roundtrip() {
        let codec = codec();
        let token = codec
            .erstellen("a@x.com", Rolle::Benutzer, Duration::hours(1))
            .unwrap();

        assert_eq!(codec.subjekt_extrahieren(&token).unwrap(), "a@x.com");
        assert!(codec.ist_gueltig(&token, "a@x.com"));
        assert!(!codec.ist_gueltig(&token, "b@x.com"));
    }

    #[test]
    fn rollen_claim_ist_lesbar() {
        let codec = codec();
        let token = codec
            .erstellen("admin@x.com", Rolle::Admin, Duration::hours(1))
            .unwrap();

        let rolle = codec.claim_extrahieren(&token, "rolle").unwrap();
        assert_eq!(rolle, serde_json::json!("ADMIN"));

        let fehler = codec.claim_extrahieren(&token, "gibtsnicht");
        assert!(matches!(fehler, Err(AuthError::TokenUngueltig(_))));
    }

    #[test]
    fn abgelaufenes_token_wird_abgelehnt() {
        let codec = codec();
        let token = codec
            .erstellen("a@x.com", Rolle::Benutzer, Duration::seconds(-10))
            .unwrap();

        assert!(!codec.ist_gueltig(&token, "a@x.com"));
        assert!(matches!(
            codec.subjekt_extrahieren(&token),
            Err(AuthError::TokenUngueltig(_))
        ));
    }

    #[test]
    fn falsches_geheimnis_wird_abgelehnt() {
        let token = codec()
            .erstellen("a@x.com", Rolle::Benutzer, Duration::hours(1))
            .unwrap();

        let anderer = TokenCodec::neu("ein-voellig-anderes-geheimnis");
        assert!(anderer.subjekt_extrahieren(&token).is_err());
        assert!(!anderer.ist_gueltig(&token, "a@x.com"));
    }

    #[test]
    fn kaputte_struktur_wird_abgelehnt() {
        let codec = codec();
        for kaputt in ["", "nur-ein-segment", "a.b", "a.b.c"] {
            assert!(
                codec.subjekt_extrahieren(kaputt).is_err(),
                "'{kaputt}' haette abgelehnt werden muessen"
            );
        }
    }
}
