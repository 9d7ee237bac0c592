//! Outbound message types for the Vonage Messages API.

use serde::Serialize;

/// Messages API sandbox endpoint.
pub const SANDBOX_MESSAGES_URL: &str = "https://messages-sandbox.nexmo.com/v1/messages";

/// The only channel replies are sent on.
pub const WHATSAPP_CHANNEL: &str = "whatsapp";

/// A text message as accepted by `POST /v1/messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    /// Sender number registered with Vonage
    pub from: String,
    /// Recipient number
    pub to: String,
    pub message_type: String,
    pub text: String,
    pub channel: String,
}

impl OutboundMessage {
    /// Build a WhatsApp text message.
    pub fn whatsapp_text(from: impl Into<String>, to: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            message_type: "text".to_string(),
            text: text.into(),
            channel: WHATSAPP_CHANNEL.to_string(),
        }
    }
}

/// Reply text echoing what the sender wrote.
pub fn echo_text(text: &str) -> String {
    format!("You sent me: {text}")
}
