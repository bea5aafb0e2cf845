//! Event type definitions.

use settle_sdk::objects::PaymentStatus;
use uuid::Uuid;

/// Why a session went away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseReason {
    /// The customer left the checkout view.
    ClientLeft,
    /// Idle for longer than the session TTL.
    Expired,
    /// The server is shutting down.
    Shutdown,
}

impl std::fmt::Display for CloseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CloseReason::ClientLeft => write!(f, "client_left"),
            CloseReason::Expired => write!(f, "expired"),
            CloseReason::Shutdown => write!(f, "shutdown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The payment status of a session changed.
    StatusChanged {
        session_id: Uuid,
        status: PaymentStatus,
    },
    /// The redirect delay after confirmation elapsed.
    Redirect { session_id: Uuid, location: String },
    /// The session was discarded and its timers cancelled.
    Closed {
        session_id: Uuid,
        reason: CloseReason,
    },
}

impl SessionEvent {
    pub fn session_id(&self) -> Uuid {
        match self {
            SessionEvent::StatusChanged { session_id, .. }
            | SessionEvent::Redirect { session_id, .. }
            | SessionEvent::Closed { session_id, .. } => *session_id,
        }
    }
}
