//! SDK for the SETTLE demo checkout.
//!
//! Holds everything both sides of the checkout agree on: the static token
//! and chain catalog, the `/payment-demo` link scheme, display formatting
//! and the JSON objects exchanged with the demo server. The HTTP and
//! WebSocket client lives behind the `client` feature.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod format;
pub mod link;
pub mod objects;

#[cfg(feature = "client")]
pub mod client;
