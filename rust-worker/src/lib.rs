//! WhatsApp echo - signed Vonage webhook responder.
//!
//! Receives inbound WhatsApp messages from the Vonage Messages API,
//! verifies the signed token and body digest, and replies to the sender
//! with an echo of their text.
//!
//! ## Flow
//!
//! ```text
//! Vonage → POST / → verify token → verify payload_hash → reply via /v1/messages
//! ```

pub mod config;
pub mod messages;
pub mod validation;
pub mod web;

// Re-export commonly used types
pub use config::{Config, ConfigError, OutboundFailurePolicy};
pub use messages::{MessagesClient, MessagesError, OutboundMessage};
pub use validation::{require_fields, MissingFields};
pub use web::{router, AppState};
