//! Application state shared across all request handlers.

use settle_core::config::SharedConfig;
use settle_core::events::session_event_channel;
use settle_core::session::SessionRegistry;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Runtime configuration (sections can be reloaded via SIGHUP).
    pub config: SharedConfig,
    /// Open checkout sessions.
    pub sessions: SessionRegistry,
}

impl AppState {
    /// Create a new AppState with an empty session registry.
    pub fn new(config: SharedConfig) -> Self {
        // Receivers are created per WebSocket via `SessionRegistry::subscribe`.
        let (events_tx, _events_rx) = session_event_channel();
        Self {
            sessions: SessionRegistry::new(config.clone(), events_tx),
            config,
        }
    }
}
