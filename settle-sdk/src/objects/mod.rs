//! JSON objects exchanged between the demo server and its clients.

pub mod catalog;
pub mod checkout;
pub mod merchant;
pub mod settlement;
pub mod ws;

pub use catalog::{ChainListing, QuoteResponse, TokenListing};
pub use checkout::{CheckoutSessionResponse, PaymentStatus, SelectPaymentOption};
pub use merchant::{DashboardStats, MockTransaction};
pub use settlement::SettlementSummary;
