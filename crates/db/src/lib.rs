//! rezeptbuch-db – Datenbank-Abstraktion
//!
//! Dieses Crate stellt das Repository-Pattern bereit, das die SQLite-
//! Persistenz hinter einheitlichen Traits abstrahiert. Die Auth-Services
//! arbeiten ausschliesslich gegen diese Traits, sodass Tests gegen eine
//! In-Memory-Datenbank laufen koennen.

pub mod error;
pub mod models;
pub mod repository;
pub mod sqlite;

// Bequeme Re-Exporte
pub use error::DbError;
pub use models::{
    berechtigungen, BenutzerRecord, BenutzerUpdate, NeuerBenutzer, NeuerToken, Rolle, TokenRecord,
};
pub use repository::{BenutzerRepository, DbResult, TokenRepository};
pub use sqlite::SqliteDb;
