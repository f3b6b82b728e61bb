//! SQLite-Implementierung der Repositories

pub mod pool;
pub mod tokens;
pub mod users;

pub use pool::SqliteDb;
