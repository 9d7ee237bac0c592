//! Configuration module for environment variable parsing.
//!
//! The four Vonage credentials are mandatory. The process refuses to serve
//! until every one of them is present and non-empty.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

use crate::messages::SANDBOX_MESSAGES_URL;
use crate::validation::MissingFields;

pub const VONAGE_API_KEY: &str = "VONAGE_API_KEY";
pub const VONAGE_ACCOUNT_SECRET: &str = "VONAGE_ACCOUNT_SECRET";
pub const VONAGE_WHATSAPP_NUMBER: &str = "VONAGE_WHATSAPP_NUMBER";
pub const VONAGE_SIGNATURE_SECRET: &str = "VONAGE_SIGNATURE_SECRET";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Missing(#[from] MissingFields),
}

/// What the webhook does when the reply to the sender cannot be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutboundFailurePolicy {
    /// Log the failure and still acknowledge the webhook with `{ok: true}`.
    #[default]
    Ignore,
    /// Answer the webhook with 502 and the failure reason.
    Surface,
}

impl FromStr for OutboundFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "surface" => Ok(Self::Surface),
            other => Err(format!("unknown outbound failure policy: {other}")),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Vonage API key, used as the Basic auth user
    pub vonage_api_key: String,

    /// Vonage account secret, used as the Basic auth password
    pub vonage_account_secret: String,

    /// WhatsApp-capable sender number registered with Vonage
    pub vonage_whatsapp_number: String,

    /// Shared secret for verifying signed webhook tokens
    pub vonage_signature_secret: String,

    /// Port for the web server to listen on
    pub port: u16,

    /// Messages API endpoint replies are posted to
    pub messages_url: String,

    /// Directory holding `index.html`
    pub static_dir: PathBuf,

    pub outbound_failure_policy: OutboundFailurePolicy,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Missing or blank credentials are collected and reported together,
    /// in declaration order.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut require = |name: &str| match lookup(name).filter(|v| !v.trim().is_empty()) {
            Some(value) => value,
            None => {
                missing.push(name.to_string());
                String::new()
            }
        };

        let vonage_api_key = require(VONAGE_API_KEY);
        let vonage_account_secret = require(VONAGE_ACCOUNT_SECRET);
        let vonage_whatsapp_number = require(VONAGE_WHATSAPP_NUMBER);
        let vonage_signature_secret = require(VONAGE_SIGNATURE_SECRET);

        if !missing.is_empty() {
            return Err(MissingFields(missing).into());
        }

        Ok(Config {
            vonage_api_key,
            vonage_account_secret,
            vonage_whatsapp_number,
            vonage_signature_secret,

            port: parse_or_default(&lookup, "PORT", 3000),

            messages_url: lookup("VONAGE_MESSAGES_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| SANDBOX_MESSAGES_URL.to_string()),

            static_dir: lookup("STATIC_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("static")),

            outbound_failure_policy: parse_or_default(
                &lookup,
                "OUTBOUND_FAILURE_POLICY",
                OutboundFailurePolicy::Ignore,
            ),
        })
    }
}

// Credentials stay out of logs even when the whole config is printed.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("vonage_api_key", &"<redacted>")
            .field("vonage_account_secret", &"<redacted>")
            .field("vonage_whatsapp_number", &self.vonage_whatsapp_number)
            .field("vonage_signature_secret", &"<redacted>")
            .field("port", &self.port)
            .field("messages_url", &self.messages_url)
            .field("static_dir", &self.static_dir)
            .field("outbound_failure_policy", &self.outbound_failure_policy)
            .finish()
    }
}

/// Parse an optional variable, falling back to `default` when absent or invalid.
fn parse_or_default<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = match lookup(name) {
        Some(v) => v,
        None => return default,
    };

    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid value, using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    fn credentials() -> Vec<(&'static str, &'static str)> {
        vec![
            (VONAGE_API_KEY, "key"),
            (VONAGE_ACCOUNT_SECRET, "secret"),
            (VONAGE_WHATSAPP_NUMBER, "14157386102"),
            (VONAGE_SIGNATURE_SECRET, "signing"),
        ]
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = Config::from_lookup(lookup_from(&credentials())).unwrap();

        assert_eq!(config.vonage_api_key, "key");
        assert_eq!(config.vonage_whatsapp_number, "14157386102");
        assert_eq!(config.port, 3000);
        assert_eq!(config.messages_url, SANDBOX_MESSAGES_URL);
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert_eq!(config.outbound_failure_policy, OutboundFailurePolicy::Ignore);
    }

    #[test]
    fn test_from_lookup_reports_all_missing() {
        let err = Config::from_lookup(lookup_from(&[(VONAGE_ACCOUNT_SECRET, "secret")]))
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Missing required fields: VONAGE_API_KEY, VONAGE_WHATSAPP_NUMBER, VONAGE_SIGNATURE_SECRET"
        );
    }

    #[test]
    fn test_from_lookup_blank_counts_as_missing() {
        let mut vars = credentials();
        vars[3] = (VONAGE_SIGNATURE_SECRET, "   ");

        let err = Config::from_lookup(lookup_from(&vars)).unwrap_err();
        assert_eq!(err.to_string(), "Missing required fields: VONAGE_SIGNATURE_SECRET");
    }

    #[test]
    fn test_from_lookup_optional_overrides() {
        let mut vars = credentials();
        vars.push(("PORT", "8080"));
        vars.push(("VONAGE_MESSAGES_URL", "http://localhost:9000/v1/messages"));
        vars.push(("STATIC_DIR", "/srv/static"));
        vars.push(("OUTBOUND_FAILURE_POLICY", "Surface"));

        let config = Config::from_lookup(lookup_from(&vars)).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.messages_url, "http://localhost:9000/v1/messages");
        assert_eq!(config.static_dir, PathBuf::from("/srv/static"));
        assert_eq!(config.outbound_failure_policy, OutboundFailurePolicy::Surface);
    }

    #[test]
    fn test_from_lookup_invalid_optional_falls_back() {
        let mut vars = credentials();
        vars.push(("PORT", "not-a-port"));
        vars.push(("OUTBOUND_FAILURE_POLICY", "retry"));

        let config = Config::from_lookup(lookup_from(&vars)).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.outbound_failure_policy, OutboundFailurePolicy::Ignore);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::from_lookup(lookup_from(&credentials())).unwrap();
        let printed = format!("{config:?}");

        assert!(!printed.contains("\"secret\""));
        assert!(!printed.contains("signing"));
        assert!(printed.contains("14157386102"));
    }
}
