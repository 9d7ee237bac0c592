//! Vonage signed webhook verification.
//!
//! Vonage signs every callback with an HS256 JWT carried as a bearer token.
//! Among its claims is `payload_hash`, the hex SHA-256 of the raw request
//! body, which binds the token to the exact bytes delivered.
//! Reference: https://developer.vonage.com/en/getting-started/concepts/webhooks#validating-signed-webhooks

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::warn;

/// Claim holding the digest of the request body.
pub const PAYLOAD_HASH_CLAIM: &str = "payload_hash";

/// Why a bearer token was rejected.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Missing bearer token")]
    Missing,

    #[error("Invalid signature token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
}

/// Claims of a token whose signature has been verified.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedClaims(Map<String, Value>);

impl SignedClaims {
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// The `payload_hash` claim, if present and a string.
    pub fn payload_hash(&self) -> Option<&str> {
        self.0.get(PAYLOAD_HASH_CLAIM).and_then(Value::as_str)
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
///
/// A missing header is treated as empty, yielding an empty token that
/// verification then rejects.
pub fn extract_bearer_token(authorization: Option<&str>) -> &str {
    authorization
        .unwrap_or("")
        .split(' ')
        .nth(1)
        .unwrap_or("")
}

/// Verify a signed webhook token with the shared signature secret.
///
/// Only HS256 is accepted. `exp` and `nbf` are honoured when present but not
/// required, since Vonage tokens carry `iat` only. No clock leeway is granted.
pub fn verify_token(token: &str, secret: &str) -> Result<SignedClaims, TokenError> {
    if token.is_empty() {
        warn!("webhook_token_missing");
        return Err(TokenError::Missing);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.required_spec_claims.clear();
    validation.validate_aud = false;
    validation.leeway = 0;

    let data = decode::<Map<String, Value>>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| {
        warn!(error = %e, "webhook_token_rejected");
        TokenError::from(e)
    })?;

    Ok(SignedClaims(data.claims))
}

/// Lowercase hex SHA-256 of the raw body.
pub fn payload_digest(raw_body: &[u8]) -> String {
    hex::encode(Sha256::digest(raw_body))
}

/// Check the raw body against the `payload_hash` claim.
pub fn verify_payload_hash(expected: &str, raw_body: &[u8]) -> bool {
    let actual = payload_digest(raw_body);
    let valid = constant_time_compare(&actual, expected);

    if !valid {
        warn!(
            expected_length = expected.len(),
            actual_length = actual.len(),
            body_length = raw_body.len(),
            "webhook_payload_hash_mismatch"
        );
    }

    valid
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
