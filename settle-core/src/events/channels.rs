//! Event channel factory and handles.

use super::types::SessionEvent;
use tokio::sync::broadcast;

/// Default buffer size for the session event channel.
///
/// A subscriber that falls further behind than this gets `Lagged` and has
/// to re-read the session state.
pub const DEFAULT_CHANNEL_BUFFER: usize = 256;

/// Sender handle for session events.
pub type SessionEventSender = broadcast::Sender<SessionEvent>;
/// Receiver handle for session events.
pub type SessionEventReceiver = broadcast::Receiver<SessionEvent>;

/// Create a new session event channel.
///
/// Further receivers are created with `SessionEventSender::subscribe`.
pub fn session_event_channel() -> (SessionEventSender, SessionEventReceiver) {
    broadcast::channel(DEFAULT_CHANNEL_BUFFER)
}
