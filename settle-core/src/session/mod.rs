//! Checkout sessions.
//!
//! A session is the server side of one open checkout view. It is created
//! from the checkout link, mutated by the customer (selection, simulate,
//! reset) and by its simulation timer, and discarded when the view exits,
//! when it idles out, or when the server stops.
//!
//! All operations go through [`SessionRegistry`] as `Processor` commands:
//!
//! - [`OpenSession`], [`GetSession`]
//! - [`SelectOption`]
//! - [`TriggerSimulation`], [`ResetSimulation`]
//! - [`CloseSession`]
//!
//! [`SessionReaper`] closes idle sessions in the background.

mod checkout;
mod reaper;
mod registry;
mod request;

pub use checkout::CheckoutSession;
pub use reaper::SessionReaper;
pub use registry::{
    CloseSession, GetSession, OpenSession, ResetSimulation, SelectOption, SessionRegistry,
    TriggerSimulation,
};
pub use request::{CheckoutRequest, DEFAULT_CURRENCY, DEFAULT_DESCRIPTION, generate_order_id};

#[cfg(test)]
pub(crate) use registry::tests as testing;

use crate::simulator::TransitionError;
use settle_sdk::objects::PaymentStatus;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("checkout session {0} not found")]
    NotFound(Uuid),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("payment option cannot change while the payment is {0}")]
    SelectionLocked(PaymentStatus),
    #[error("payment option cannot change while a simulation is running")]
    SelectionWhileRunning,
    #[error("payment is {0}, the summary needs a confirmed payment")]
    NotConfirmed(PaymentStatus),
}
