//! REST-Server
//!
//! Bindet den Router an eine Adresse und haengt CORS- und Trace-Layer an.

use std::net::SocketAddr;

use axum::{http::HeaderValue, Json, Router};
use serde_json::json;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{routes::api_router, state::ApiState};

/// Konfiguration des REST-Servers
#[derive(Debug, Clone)]
pub struct RestServerKonfig {
    pub bind_adresse: SocketAddr,
    /// Erlaubte CORS-Origins (leer = alle erlauben)
    pub cors_origins: Vec<String>,
}

/// REST-Server der API
pub struct RestServer {
    konfig: RestServerKonfig,
}

impl RestServer {
    pub fn neu(konfig: RestServerKonfig) -> Self {
        Self { konfig }
    }

    /// Baut den vollstaendigen Router samt Layern
    pub fn router(&self, state: ApiState) -> Router {
        api_router(state)
            .layer(cors_layer(&self.konfig.cors_origins))
            .layer(TraceLayer::new_for_http())
    }

    /// Startet den Server und blockiert bis zum Shutdown
    pub async fn starten(&self, state: ApiState) -> anyhow::Result<()> {
        let router = self.router(state);
        let listener = tokio::net::TcpListener::bind(self.konfig.bind_adresse).await?;

        tracing::info!(adresse = %self.konfig.bind_adresse, "REST-Server gestartet");
        axum::serve(listener, router).await?;
        Ok(())
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let erlaubte: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(erlaubte))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
