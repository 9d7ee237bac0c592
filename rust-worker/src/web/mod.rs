//! Web server module for the signed Vonage webhook.
//!
//! This module provides:
//! - `GET /`: the static landing page
//! - any other method on `/`: the signed webhook that echoes WhatsApp texts
//! - `GET /health`: liveness probe

pub mod handlers;
pub mod signature;
pub mod static_files;

use axum::{
    routing::{any, get},
    Router,
};
use tower_http::trace::TraceLayer;

pub use handlers::{health, root, vonage_webhook, AppState, HealthResponse, WebhookResponse};
pub use signature::{
    extract_bearer_token, payload_digest, verify_payload_hash, verify_token, SignedClaims,
    TokenError, PAYLOAD_HASH_CLAIM,
};
pub use static_files::{StaticFileError, StaticFiles, INDEX_FILE};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", any(root))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
