//! Vonage Messages API module.
//!
//! This module provides:
//! - The outbound message shape for WhatsApp text replies
//! - A shared client that posts replies with Basic auth
//!
//! ## Flow
//!
//! ```text
//! Verified webhook → OutboundMessage → MessagesClient → Vonage /v1/messages
//! ```

pub mod client;
pub mod types;

pub use client::{basic_credentials, MessagesClient, MessagesError};
pub use types::{echo_text, OutboundMessage, SANDBOX_MESSAGES_URL, WHATSAPP_CHANNEL};
