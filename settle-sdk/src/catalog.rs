//! Static token and chain catalog.
//!
//! Prices are fixed demo values, not market data.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// All tokens a customer can pay with
#[serde(rename_all = "UPPERCASE")]
pub enum TokenSymbol {
    Usdc,
    Usdt,
    Eth,
    Sol,
    Matic,
    /// Native symbol of Avalanche. Listed for chains only, it has no price.
    Avax,
}

impl TokenSymbol {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenSymbol::Usdc => "USDC",
            TokenSymbol::Usdt => "USDT",
            TokenSymbol::Eth => "ETH",
            TokenSymbol::Sol => "SOL",
            TokenSymbol::Matic => "MATIC",
            TokenSymbol::Avax => "AVAX",
        }
    }
}

impl std::fmt::Display for TokenSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not a known symbol or chain id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown catalog entry: {0}")]
pub struct UnknownEntry(pub String);

impl FromStr for TokenSymbol {
    type Err = UnknownEntry;

    /// Symbols are matched exactly; `eth` is not `ETH`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USDC" => Ok(TokenSymbol::Usdc),
            "USDT" => Ok(TokenSymbol::Usdt),
            "ETH" => Ok(TokenSymbol::Eth),
            "SOL" => Ok(TokenSymbol::Sol),
            "MATIC" => Ok(TokenSymbol::Matic),
            "AVAX" => Ok(TokenSymbol::Avax),
            other => Err(UnknownEntry(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// All chains the checkout offers
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Ethereum,
    Polygon,
    Arbitrum,
    Solana,
    Avalanche,
}

impl Chain {
    pub const ALL: [Chain; 5] = [
        Chain::Ethereum,
        Chain::Polygon,
        Chain::Arbitrum,
        Chain::Solana,
        Chain::Avalanche,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Chain::Ethereum => "ethereum",
            Chain::Polygon => "polygon",
            Chain::Arbitrum => "arbitrum",
            Chain::Solana => "solana",
            Chain::Avalanche => "avalanche",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Chain::Ethereum => "Ethereum",
            Chain::Polygon => "Polygon",
            Chain::Arbitrum => "Arbitrum",
            Chain::Solana => "Solana",
            Chain::Avalanche => "Avalanche",
        }
    }

    pub fn native_symbol(&self) -> TokenSymbol {
        match self {
            Chain::Ethereum | Chain::Arbitrum => TokenSymbol::Eth,
            Chain::Polygon => TokenSymbol::Matic,
            Chain::Solana => TokenSymbol::Sol,
            Chain::Avalanche => TokenSymbol::Avax,
        }
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Chain {
    type Err = UnknownEntry;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Chain::ALL
            .into_iter()
            .find(|c| c.id() == s)
            .ok_or_else(|| UnknownEntry(s.to_owned()))
    }
}

/// A priced token in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub symbol: TokenSymbol,
    pub name: &'static str,
    pub price_usd: Decimal,
}

/// The static price table, in display order.
pub const TOKENS: [Token; 5] = [
    Token {
        symbol: TokenSymbol::Usdc,
        name: "USD Coin",
        price_usd: Decimal::from_parts(100, 0, 0, false, 2),
    },
    Token {
        symbol: TokenSymbol::Usdt,
        name: "Tether",
        price_usd: Decimal::from_parts(100, 0, 0, false, 2),
    },
    Token {
        symbol: TokenSymbol::Eth,
        name: "Ethereum",
        price_usd: Decimal::from_parts(245000, 0, 0, false, 2),
    },
    Token {
        symbol: TokenSymbol::Sol,
        name: "Solana",
        price_usd: Decimal::from_parts(13000, 0, 0, false, 2),
    },
    Token {
        symbol: TokenSymbol::Matic,
        name: "Polygon",
        price_usd: Decimal::from_parts(85, 0, 0, false, 2),
    },
];

/// Token preselected by the checkout widget.
pub const DEFAULT_TOKEN: TokenSymbol = TokenSymbol::Eth;

/// Chain preselected by the checkout widget.
pub const DEFAULT_CHAIN: Chain = Chain::Ethereum;

/// Find a priced token by its exact symbol.
pub fn find_token(symbol: &str) -> Option<&'static Token> {
    TOKENS.iter().find(|t| t.symbol.as_str() == symbol)
}
