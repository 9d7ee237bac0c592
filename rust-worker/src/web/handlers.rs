//! Webhook endpoint handlers.
//!
//! `GET /` serves the landing page. Every other method on `/` runs the
//! signed-webhook pipeline, strictly in this order:
//! 1. Verify the bearer token signature
//! 2. Require the `payload_hash` claim
//! 3. Compare the raw body digest against `payload_hash`
//! 4. Require the `from` and `text` body fields
//! 5. Acknowledge status callbacks, or reply to the sender
//!
//! The body is not parsed until step 3 has passed.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use crate::config::OutboundFailurePolicy;
use crate::messages::{echo_text, MessagesClient};
use crate::validation::require_fields;
use crate::web::signature::{
    extract_bearer_token, verify_payload_hash, verify_token, PAYLOAD_HASH_CLAIM,
};
use crate::web::static_files::{StaticFiles, INDEX_FILE};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub messages: MessagesClient,
    pub static_files: StaticFiles,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let messages = MessagesClient::new(&config);
        let static_files = StaticFiles::new(config.static_dir.clone());

        Self {
            config: Arc::new(config),
            messages,
            static_files,
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Vonage Webhook
// =============================================================================

/// Webhook response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
}

impl WebhookResponse {
    fn accepted() -> Self {
        Self {
            ok: true,
            error: None,
            status: None,
        }
    }

    fn rejected(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            status: None,
        }
    }
}

type WebhookReply = (StatusCode, Json<WebhookResponse>);

fn reject(code: StatusCode, error: impl Into<String>) -> WebhookReply {
    (code, Json(WebhookResponse::rejected(error)))
}

/// Entry point for `/`: the landing page on GET, the webhook otherwise.
pub async fn root(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if method == Method::GET {
        return index(&state.static_files).await;
    }

    vonage_webhook(&state, &headers, &body).await.into_response()
}

async fn index(static_files: &StaticFiles) -> Response {
    match static_files.read(INDEX_FILE).await {
        Ok(html) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            html,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, root = %static_files.root().display(), "static_index_unavailable");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Signed Vonage webhook.
///
/// Token failures answer 401 rather than escaping as a server fault.
pub async fn vonage_webhook(state: &AppState, headers: &HeaderMap, raw_body: &[u8]) -> WebhookReply {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    info!(
        has_authorization = authorization.is_some(),
        body_length = raw_body.len(),
        "vonage_webhook_received"
    );

    let token = extract_bearer_token(authorization);
    let claims = match verify_token(token, &state.config.vonage_signature_secret) {
        Ok(claims) => claims,
        Err(e) => return reject(StatusCode::UNAUTHORIZED, e.to_string()),
    };

    if let Err(e) = require_fields(claims.as_map(), &[PAYLOAD_HASH_CLAIM]) {
        warn!(error = %e, "vonage_webhook_claims_incomplete");
        return reject(StatusCode::BAD_REQUEST, e.to_string());
    }

    // A non-string payload_hash can never match a hex digest.
    let expected = claims.payload_hash().unwrap_or_default();
    if !verify_payload_hash(expected, raw_body) {
        return reject(StatusCode::UNAUTHORIZED, "Payload hash mismatched");
    }

    // Non-object bodies carry none of the required fields.
    let body: Map<String, Value> = serde_json::from_slice(raw_body).unwrap_or_else(|e| {
        debug!(error = %e, "vonage_webhook_body_not_object");
        Map::new()
    });

    if let Err(e) = require_fields(&body, &["from", "text"]) {
        warn!(error = %e, "vonage_webhook_body_incomplete");
        return reject(StatusCode::BAD_REQUEST, e.to_string());
    }

    let text = match body.get("text") {
        Some(Value::Null) | None => {
            let status = body.get("status").cloned();
            info!(status = ?status, "vonage_status_acknowledged");
            return (
                StatusCode::OK,
                Json(WebhookResponse {
                    ok: true,
                    error: None,
                    status,
                }),
            );
        }
        Some(text) => render(text),
    };
    let to = body.get("from").map(render).unwrap_or_default();

    if let Err(e) = state.messages.send_whatsapp_text(&to, &echo_text(&text)).await {
        match state.config.outbound_failure_policy {
            OutboundFailurePolicy::Ignore => {
                warn!(error = %e, to = %to, "vonage_reply_failed_ignored");
            }
            OutboundFailurePolicy::Surface => {
                return reject(StatusCode::BAD_GATEWAY, e.to_string());
            }
        }
    }

    info!(to = %to, "vonage_webhook_replied");

    (StatusCode::OK, Json(WebhookResponse::accepted()))
}

/// String values as-is, anything else as its JSON text.
///
/// Outbound numbers are always strings: a numeric `from` such as
/// `15551234567` is replied to as `"15551234567"`.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
