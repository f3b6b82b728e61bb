//! rezeptbuch-api – REST-Oberflaeche und Autorisierungs-Filter
//!
//! Dieses Crate verbindet die Auth-Services mit dem HTTP-Stack:
//! - Autorisierungs-Filter (einmal pro Anfrage, vor dem Routing-Handler)
//! - AuthKontext-Extractor fuer Handler
//! - Fehleruebersetzung AuthError -> HTTP-Statuscodes
//! - Routen und Handler der API v1
//! - REST-Server mit CORS- und Trace-Layern

pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use extract::AuthKontext;
pub use routes::api_router;
pub use server::{RestServer, RestServerKonfig};
pub use state::ApiState;
