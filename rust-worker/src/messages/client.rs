//! Async client for sending replies through the Vonage Messages API.
//!
//! The client is cheap to clone and shared across request handlers.
//! It performs exactly one POST per reply: no retries and no timeout
//! beyond the HTTP client's defaults.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{header, Client, StatusCode};
use thiserror::Error;
use tracing::{error, info};

use super::types::OutboundMessage;
use crate::Config;

/// Failure to hand a reply to the Messages API.
#[derive(Debug, Error)]
pub enum MessagesError {
    #[error("Messages API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Messages API returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Messages API client holding the sender number and Basic credentials.
#[derive(Clone)]
pub struct MessagesClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: Client,
    url: String,
    authorization: String,
    from_number: String,
}

/// Encode `<api_key>:<account_secret>` for the Basic auth header.
pub fn basic_credentials(api_key: &str, account_secret: &str) -> String {
    STANDARD.encode(format!("{api_key}:{account_secret}"))
}

impl MessagesClient {
    /// Create a client from the loaded configuration.
    pub fn new(config: &Config) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Create a client around an existing `reqwest::Client`.
    pub fn with_client(http: Client, config: &Config) -> Self {
        let encoded = basic_credentials(&config.vonage_api_key, &config.vonage_account_secret);

        Self {
            inner: Arc::new(ClientInner {
                http,
                url: config.messages_url.clone(),
                authorization: format!("Basic {encoded}"),
                from_number: config.vonage_whatsapp_number.clone(),
            }),
        }
    }

    /// The configured sender number.
    pub fn from_number(&self) -> &str {
        &self.inner.from_number
    }

    /// Send a WhatsApp text from the configured number to `to`.
    pub async fn send_whatsapp_text(&self, to: &str, text: &str) -> Result<StatusCode, MessagesError> {
        let message = OutboundMessage::whatsapp_text(self.from_number(), to, text);
        self.send(&message).await
    }

    /// Post a message and report the provider's status code.
    ///
    /// Non-2xx answers are returned as [`MessagesError::Status`] so callers
    /// can log or surface them.
    pub async fn send(&self, message: &OutboundMessage) -> Result<StatusCode, MessagesError> {
        info!(
            to = %message.to,
            channel = %message.channel,
            text_length = message.text.len(),
            "messages_send_starting"
        );

        let response = self
            .inner
            .http
            .post(&self.inner.url)
            .header(header::AUTHORIZATION, &self.inner.authorization)
            .json(message)
            .send()
            .await
            .map_err(|e| {
                error!(url = %self.inner.url, error = %e, "messages_send_request_error");
                MessagesError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status_code = status.as_u16(), body = %body, "messages_send_rejected");
            return Err(MessagesError::Status { status, body });
        }

        info!(status_code = status.as_u16(), to = %message.to, "messages_send_complete");

        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutboundFailurePolicy;
    use std::path::PathBuf;

    fn test_config() -> Config {
        Config {
            vonage_api_key: "key".to_string(),
            vonage_account_secret: "secret".to_string(),
            vonage_whatsapp_number: "14157386102".to_string(),
            vonage_signature_secret: "S".to_string(),
            port: 3000,
            messages_url: "http://127.0.0.1:1/v1/messages".to_string(),
            static_dir: PathBuf::from("static"),
            outbound_failure_policy: OutboundFailurePolicy::Ignore,
        }
    }

    #[test]
    fn test_basic_credentials() {
        assert_eq!(basic_credentials("key", "secret"), "a2V5OnNlY3JldA==");
    }

    #[test]
    fn test_client_creation() {
        let client = MessagesClient::new(&test_config());

        assert_eq!(client.from_number(), "14157386102");
        assert_eq!(client.inner.authorization, "Basic a2V5OnNlY3JldA==");
        assert_eq!(Arc::strong_count(&client.inner), 1);
    }

    #[tokio::test]
    async fn test_send_unreachable_is_request_error() {
        let client = MessagesClient::new(&test_config());
        let result = client.send_whatsapp_text("15551234567", "hi").await;

        assert!(matches!(result, Err(MessagesError::Request(_))));
    }
}
