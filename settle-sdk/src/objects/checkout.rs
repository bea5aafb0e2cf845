//! Checkout session objects and the payment status lifecycle.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Chain;

/// Status of a simulated payment.
///
/// Progresses strictly `Pending -> Detected -> Confirmed`; only a reset
/// goes back to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Detected,
    Confirmed,
}

impl PaymentStatus {
    /// The status a simulation moves to next, `None` once confirmed.
    pub fn next(self) -> Option<PaymentStatus> {
        match self {
            PaymentStatus::Pending => Some(PaymentStatus::Detected),
            PaymentStatus::Detected => Some(PaymentStatus::Confirmed),
            PaymentStatus::Confirmed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PaymentStatus::Confirmed)
    }

    /// Message shown next to the status indicator.
    pub fn message(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Waiting for payment...",
            PaymentStatus::Detected => "Payment detected! Awaiting confirmation...",
            PaymentStatus::Confirmed => "Payment confirmed! Redirecting...",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Detected => write!(f, "detected"),
            PaymentStatus::Confirmed => write!(f, "confirmed"),
        }
    }
}

/// Request body for changing the token and/or chain of an open checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectPaymentOption {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub chain: Option<Chain>,
}

/// Snapshot of an open checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSessionResponse {
    pub session_id: Uuid,
    pub order_id: String,
    pub description: String,
    pub currency: String,
    pub usd_amount: Decimal,
    pub token: String,
    pub chain: Chain,
    pub crypto_amount: Decimal,
    /// `0.061224 ETH`
    pub crypto_display: String,
    /// `1 ETH = $2450.00`, absent for unknown tokens.
    pub rate: Option<String>,
    pub payment_address: String,
    pub status: PaymentStatus,
    pub status_message: String,
    /// Whether a simulation run is in flight.
    pub simulating: bool,
    pub redirect_url: Option<String>,
    /// Unix timestamp of when the session was opened.
    pub created_at: i64,
}
