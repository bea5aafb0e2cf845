#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod address;
pub mod config;
pub mod events;
pub mod ledger;
pub mod pricing;
pub mod session;
pub mod settlement;
pub mod simulator;
