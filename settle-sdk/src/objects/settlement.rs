//! Payment success view.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Chain;

/// What the customer sees after a confirmed checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementSummary {
    pub session_id: Uuid,
    pub order_id: String,
    /// `$150.00`
    pub amount: String,
    /// `0.061224 ETH on Ethereum`
    pub customer_payment: String,
    pub source_chain: Chain,
    pub settlement_amount: Decimal,
    /// `150.000000 USDC`
    pub settlement_display: String,
    pub settlement_token: String,
    pub settlement_chain: Chain,
    /// `m:ss` between the simulate action and confirmation.
    pub processing_time: String,
    pub payment_address: String,
    /// Unix timestamp of confirmation.
    pub confirmed_at: i64,
}
