//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (database ping)
//!
//! POST /usuarios-whatsapp       - Register a WhatsApp user by CEP
//! POST /processar-ofertas       - Ingest extracted offers for a supermarket
//! POST /ofertas-personalizadas  - Build a user's personalized offer payload
//! ```
//!
//! All three POST endpoints speak the reference JSON wire format: business
//! failures come back as HTTP 200 with `success: false` and a message, so
//! the WhatsApp bot can branch on semantics; only malformed requests (400)
//! and store failures (500) use error statuses. `OPTIONS` preflight is
//! answered by the CORS layer.

pub mod ingestion;
pub mod personalization;
pub mod registration;

use axum::{
    Router,
    http::{HeaderName, Method, header},
    routing::post,
};
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/usuarios-whatsapp", post(registration::register))
        .route("/processar-ofertas", post(ingestion::process))
        .route("/ofertas-personalizadas", post(personalization::build))
}

/// Permissive CORS for the browser-side callers (reference headers).
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}
