//! Merchant configuration.

use settle_sdk::catalog::{Chain, TokenSymbol};
use settle_sdk::link::SUCCESS_PATH;

/// The merchant the demo checkout collects for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerchantConfig {
    /// Human-readable merchant name.
    pub name: String,
    /// Public key put into generated checkout links as `pk`.
    pub public_key: String,
    /// Token the merchant is settled in.
    pub settlement_token: TokenSymbol,
    /// Chain the merchant is settled on.
    pub settlement_chain: Chain,
    /// Where customers go after confirmation when the link has no
    /// `redirectUrl`. The server mounts the success view here.
    pub success_path: String,
}

impl MerchantConfig {
    pub fn new(name: String, public_key: String) -> Self {
        Self {
            name,
            public_key,
            settlement_token: TokenSymbol::Usdc,
            settlement_chain: Chain::Polygon,
            success_path: SUCCESS_PATH.to_owned(),
        }
    }
}
