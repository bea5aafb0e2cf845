//! Merchant dashboard objects.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A row of the merchant transaction table.
///
/// All amounts are preformatted labels; nothing here is computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockTransaction {
    pub id: String,
    pub order_id: String,
    pub date: String,
    pub customer_payment: String,
    pub amount_settled: String,
    pub status: String,
    pub source_chain: String,
    pub source_amount: String,
    pub settlement_chain: String,
    pub settlement_amount: String,
    pub exchange_rate: String,
    pub tx_hash: String,
    pub settlement_tx_hash: Option<String>,
}

/// Headline numbers of the merchant dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_volume: Decimal,
    pub total_volume_display: String,
    pub transactions_today: u32,
    pub average_sale: Decimal,
    pub average_sale_display: String,
    /// Percent.
    pub conversion_rate: Decimal,
}
