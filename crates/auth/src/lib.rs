//! rezeptbuch-auth – Authentifizierung und Token-Lebenszyklus
//!
//! Dieses Crate implementiert:
//! - Passwort-Hashing mit Argon2id
//! - Token-Codec (signierte JWTs mit Subjekt-, Rollen- und Ablauf-Claims)
//! - Token-Store (persistierte Token-Eintraege mit Liveness-Pruefung)
//! - AuthService (Registrierung, Anmeldung, Passwortwechsel)
//! - AbmeldeService (Widerruf einzelner oder aller Tokens eines Benutzers)
//! - SperrService (administrative Kontosperren inkl. Session-Widerruf)

pub mod error;
pub mod jwt;
pub mod logout;
pub mod password;
pub mod service;
pub mod sperr_service;
pub mod token_store;

#[cfg(test)]
pub(crate) mod test_support;

// Bequeme Re-Exporte
pub use error::{AuthError, AuthResult};
pub use jwt::{Claims, TokenCodec};
pub use logout::AbmeldeService;
pub use password::{passwort_hashen, passwort_verifizieren};
pub use service::{AuthService, Registrierung};
pub use sperr_service::SperrService;
pub use token_store::TokenStore;
