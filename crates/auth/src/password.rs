//! Passwort-Hashing mit Argon2id
//!
//! Einweg-Hashing mit zufaelligem Salt; gespeichert wird der PHC-String.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params, Version,
};

use crate::error::AuthError;

/// Argon2id-Instanz mit den OWASP-Minimalparametern (19 MiB, t=2, p=1)
fn argon2_instanz() -> Argon2<'static> {
    let params = Params::new(19 * 1024, 2, 1, None).expect("Argon2-Parameter ungueltig");
    Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params)
}

/// Hasht ein Passwort mit Argon2id und einem zufaelligen Salt
pub fn passwort_hashen(passwort: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2_instanz()
        .hash_password(passwort.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswortHashing(e.to_string()))
}

/// Verifiziert ein Passwort gegen einen gespeicherten PHC-Hash
///
/// Gibt `Ok(false)` bei falschem Passwort zurueck; Fehler nur bei
/// kaputtem Hash-Format oder internen Problemen.
pub fn passwort_verifizieren(passwort: &str, hash: &str) -> Result<bool, AuthError> {
    let geparst = PasswordHash::new(hash)
        .map_err(|e| AuthError::PasswortHashing(format!("Ungueltiges Hash-Format: {e}")))?;

    match argon2_instanz().verify_password(passwort.as_bytes(), &geparst) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::PasswortHashing(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashen_und_verifizieren() {
        let hash = passwort_hashen("pw123456").expect("Hashing fehlgeschlagen");
        assert!(hash.starts_with("$argon2id$"));
        assert!(passwort_verifizieren("pw123456", &hash).unwrap());
    }

    #[test]
    fn falsches_passwort_wird_abgelehnt() {
        let hash = passwort_hashen("richtig").unwrap();
        assert!(!passwort_verifizieren("falsch", &hash).unwrap());
    }

    #[test]
    fn salz_macht_hashes_verschieden() {
        let h1 = passwort_hashen("gleich").unwrap();
        let h2 = passwort_hashen("gleich").unwrap();
        assert_ne!(h1, h2);
    }

    #[test]
    fn kaputtes_hash_format_gibt_fehler() {
        assert!(passwort_verifizieren("pw", "kein_phc_string").is_err());
    }
}
