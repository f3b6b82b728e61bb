//! Datenbankmodelle fuer Rezeptbuch
//!
//! Diese Typen repraesentieren Datensaetze aus der Datenbank.
//! Sie sind reine Datenuebertragungsobjekte ohne Geschaeftslogik,
//! mit Ausnahme kleiner Zustandspraedikate (`ist_live`, `berechtigungen`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Rollen und Berechtigungen
// ---------------------------------------------------------------------------

/// Berechtigungs-Schluessel
///
/// Statische Strings, die von den Routen-Anforderungen geprueft werden.
pub mod berechtigungen {
    pub const REZEPT_LESEN: &str = "rezept:lesen";
    pub const REZEPT_ERSTELLEN: &str = "rezept:erstellen";
    pub const REZEPT_AENDERN: &str = "rezept:aendern";
    pub const REZEPT_LOESCHEN: &str = "rezept:loeschen";
    pub const KATEGORIE_LESEN: &str = "kategorie:lesen";
    pub const KATEGORIE_ERSTELLEN: &str = "kategorie:erstellen";
    pub const BENUTZER_LESEN: &str = "benutzer:lesen";
    pub const BENUTZER_AENDERN: &str = "benutzer:aendern";
    pub const BENUTZER_LOESCHEN: &str = "benutzer:loeschen";
    pub const ADMIN_VERWALTEN: &str = "admin:verwalten";
}

/// Benutzerrolle (geschlossenes Enum)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Rolle {
    Admin,
    Benutzer,
}

impl Rolle {
    pub fn als_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Benutzer => "BENUTZER",
        }
    }

    /// Statische Zuordnung Rolle -> Berechtigungs-Set
    ///
    /// Die Berechtigungen sind ein abgeleiteter Schnappschuss; die
    /// autoritative Pruefung eines Tokens bleibt der Token-Store.
    pub fn berechtigungen(&self) -> &'static [&'static str] {
        use berechtigungen::*;
        match self {
            Self::Admin => &[
                REZEPT_LESEN,
                REZEPT_ERSTELLEN,
                REZEPT_AENDERN,
                REZEPT_LOESCHEN,
                KATEGORIE_LESEN,
                KATEGORIE_ERSTELLEN,
                BENUTZER_LESEN,
                BENUTZER_AENDERN,
                BENUTZER_LOESCHEN,
                ADMIN_VERWALTEN,
            ],
            Self::Benutzer => &[REZEPT_LESEN, REZEPT_ERSTELLEN, BENUTZER_LESEN],
        }
    }

    /// Normalisiert einen Rollen-String aus einem Token-Claim
    ///
    /// Akzeptiert beide im Umlauf befindlichen Schreibweisen: die rohe
    /// Rolle ("ADMIN") und die praefixierte Variante ("ROLE_ADMIN"),
    /// jeweils unabhaengig von Gross-/Kleinschreibung. Intern existiert
    /// nur die kanonische Enum-Repraesentation.
    pub fn normalisieren(claim: &str) -> Option<Self> {
        let roh = claim.trim();
        let roh = roh
            .strip_prefix("ROLE_")
            .or_else(|| roh.strip_prefix("role_"))
            .unwrap_or(roh);
        match roh.to_ascii_uppercase().as_str() {
            "ADMIN" => Some(Self::Admin),
            "BENUTZER" | "USER" => Some(Self::Benutzer),
            _ => None,
        }
    }
}

impl std::str::FromStr for Rolle {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalisieren(s).ok_or_else(|| format!("Unbekannte Rolle: {s}"))
    }
}

// ---------------------------------------------------------------------------
// Benutzer
// ---------------------------------------------------------------------------

/// Benutzer-Datensatz aus der Datenbank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenutzerRecord {
    pub id: Uuid,
    /// E-Mail-Adresse – das eindeutige Subjekt aller Tokens
    pub email: String,
    pub vorname: String,
    pub nachname: String,
    /// Argon2id-PHC-String
    pub password_hash: String,
    pub rolle: Rolle,
    /// Ob das Konto administrativ gesperrt ist
    pub gesperrt: bool,
    /// Sperrgrund (nur gesetzt wenn gesperrt)
    pub sperrgrund: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Daten zum Erstellen eines neuen Benutzers
#[derive(Debug, Clone)]
pub struct NeuerBenutzer<'a> {
    pub email: &'a str,
    pub vorname: &'a str,
    pub nachname: &'a str,
    pub password_hash: &'a str,
    pub rolle: Rolle,
}

/// Daten zum Aktualisieren eines Benutzers
#[derive(Debug, Clone, Default)]
pub struct BenutzerUpdate {
    pub password_hash: Option<String>,
    pub rolle: Option<Rolle>,
    pub gesperrt: Option<bool>,
    /// Doppeltes Option: aeusseres = Feld aendern?, inneres = neuer Wert
    pub sperrgrund: Option<Option<String>>,
    pub last_login: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// Ausgestelltes Bearer-Token (wie es in der DB gespeichert wird)
///
/// Tokens werden nie physisch geloescht, sondern nur ueber die beiden
/// Flags weich invalidiert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRecord {
    pub id: Uuid,
    /// Der vollstaendige Token-String (eindeutig)
    pub token: String,
    /// ID des Benutzers dem dieses Token gehoert
    pub user_id: Uuid,
    pub abgelaufen: bool,
    pub widerrufen: bool,
    pub erstellt_am: DateTime<Utc>,
}

impl TokenRecord {
    /// Ein Token ist live wenn es weder abgelaufen noch widerrufen ist
    pub fn ist_live(&self) -> bool {
        !self.abgelaufen && !self.widerrufen
    }
}

/// Daten zum Erstellen eines neuen Token-Eintrags
#[derive(Debug, Clone)]
pub struct NeuerToken<'a> {
    pub token: &'a str,
    pub user_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolle_normalisieren_akzeptiert_beide_konventionen() {
        assert_eq!(Rolle::normalisieren("ADMIN"), Some(Rolle::Admin));
        assert_eq!(Rolle::normalisieren("ROLE_ADMIN"), Some(Rolle::Admin));
        assert_eq!(Rolle::normalisieren("role_admin"), Some(Rolle::Admin));
        assert_eq!(Rolle::normalisieren("benutzer"), Some(Rolle::Benutzer));
        assert_eq!(Rolle::normalisieren("ROLE_USER"), Some(Rolle::Benutzer));
        assert_eq!(Rolle::normalisieren("gast"), None);
    }

    #[test]
    fn admin_hat_alle_benutzer_berechtigungen() {
        let admin = Rolle::Admin.berechtigungen();
        for b in Rolle::Benutzer.berechtigungen() {
            assert!(admin.contains(b), "Admin fehlt Berechtigung {b}");
        }
        assert!(admin.contains(&berechtigungen::ADMIN_VERWALTEN));
    }

    #[test]
    fn benutzer_darf_nicht_verwalten() {
        assert!(!Rolle::Benutzer
            .berechtigungen()
            .contains(&berechtigungen::ADMIN_VERWALTEN));
    }

    #[test]
    fn token_liveness_praedikat() {
        let mut t = TokenRecord {
            id: Uuid::new_v4(),
            token: "abc".into(),
            user_id: Uuid::new_v4(),
            abgelaufen: false,
            widerrufen: false,
            erstellt_am: Utc::now(),
        };
        assert!(t.ist_live());
        t.widerrufen = true;
        assert!(!t.ist_live());
        t.widerrufen = false;
        t.abgelaufen = true;
        assert!(!t.ist_live());
    }
}
