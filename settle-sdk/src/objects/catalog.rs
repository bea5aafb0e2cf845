//! Catalog and quote responses.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{Chain, TOKENS, Token, TokenSymbol};

/// A token as listed to the checkout selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenListing {
    pub symbol: TokenSymbol,
    pub name: String,
    pub price_usd: Decimal,
}

impl From<&Token> for TokenListing {
    fn from(token: &Token) -> Self {
        Self {
            symbol: token.symbol,
            name: token.name.to_owned(),
            price_usd: token.price_usd,
        }
    }
}

impl TokenListing {
    pub fn all() -> Vec<TokenListing> {
        TOKENS.iter().map(TokenListing::from).collect()
    }
}

/// A chain as listed to the network selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainListing {
    pub id: Chain,
    pub name: String,
    pub native_symbol: TokenSymbol,
}

impl From<Chain> for ChainListing {
    fn from(chain: Chain) -> Self {
        Self {
            id: chain,
            name: chain.name().to_owned(),
            native_symbol: chain.native_symbol(),
        }
    }
}

impl ChainListing {
    pub fn all() -> Vec<ChainListing> {
        Chain::ALL.into_iter().map(ChainListing::from).collect()
    }
}

/// Result of converting a USD amount into a token amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub usd_amount: Decimal,
    /// The symbol as requested, known or not.
    pub token: String,
    /// Zero when the token is unknown.
    pub crypto_amount: Decimal,
    /// `0.061224 ETH`
    pub display: String,
    /// `1 ETH = $2450.00`, absent for unknown tokens.
    pub rate: Option<String>,
}
