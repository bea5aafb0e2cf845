//! WebSocket message types for the checkout status stream.
//!
//! The `GET /api/v1/checkout/{session_id}/ws` endpoint upgrades to a
//! WebSocket connection and pushes [`WsServerMessage`] JSON frames.
//!
//! # Protocol
//!
//! 1. The server sends a [`WsServerMessage::StatusUpdate`] with the
//!    current session immediately after the upgrade.
//! 2. Further [`WsServerMessage::StatusUpdate`] frames follow every
//!    status change, including resets back to `pending`.
//! 3. Once the redirect delay after confirmation has elapsed the server
//!    sends [`WsServerMessage::Redirect`] and a normal close frame.
//! 4. Closing the socket from the client side closes the checkout
//!    session and cancels its timers.
//! 5. If the session does not exist the server sends an error frame and
//!    closes with [`WsCloseCode::SESSION_NOT_FOUND`].

use serde::{Deserialize, Serialize};

use super::checkout::CheckoutSessionResponse;

/// Server-to-client WebSocket message.
///
/// Serialized as an internally-tagged JSON object:
///
/// ```json
/// {"type":"status_update","session":{ ... }}
/// {"type":"redirect","location":"/payment-success?session=..."}
/// {"type":"error","code":4004,"reason":"session not found"}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsServerMessage {
    /// Session snapshot, sent first and on every status change.
    StatusUpdate { session: CheckoutSessionResponse },

    /// The customer should now be sent to `location`.
    Redirect { location: String },

    /// A server-side error. A close frame usually follows.
    Error { code: u16, reason: String },
}

/// Well-known WebSocket close codes used by the status stream.
///
/// Codes in the 4000–4999 range are reserved for application use by
/// [RFC 6455 §7.4.2](https://www.rfc-editor.org/rfc/rfc6455#section-7.4.2).
pub struct WsCloseCode;

impl WsCloseCode {
    /// Normal closure after the redirect has been delivered.
    pub const NORMAL: u16 = 1000;

    /// The server is shutting down or the session was closed elsewhere.
    pub const GOING_AWAY: u16 = 1001;

    /// The requested session does not exist.
    pub const SESSION_NOT_FOUND: u16 = 4004;
}
