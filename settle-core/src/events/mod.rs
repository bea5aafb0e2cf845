//! Session events.
//!
//! Every observable change of a checkout session is published on one
//! broadcast channel. Events carry the session id and the new value only;
//! subscribers that need the full session read it from the registry.
//!
//! # Event Flow
//!
//! 1. `TriggerSimulation` spawns a timer run
//! 2. The run emits `StatusChanged(detected)`, `StatusChanged(confirmed)`
//!    and finally `Redirect`
//! 3. `ResetSimulation` emits `StatusChanged(pending)`
//! 4. `CloseSession` and the reaper emit `Closed`

pub mod channels;
pub mod types;

pub use channels::{
    DEFAULT_CHANNEL_BUFFER, SessionEventReceiver, SessionEventSender, session_event_channel,
};
pub use types::{CloseReason, SessionEvent};
