//! USD to token conversion against the static price table.

use rust_decimal::Decimal;
use settle_sdk::catalog::find_token;
use settle_sdk::format::{fixed, format_crypto};
use settle_sdk::objects::QuoteResponse;

/// Unit price of `symbol` in USD, zero for unknown symbols.
pub fn price_of(symbol: &str) -> Decimal {
    find_token(symbol)
        .map(|t| t.price_usd)
        .unwrap_or(Decimal::ZERO)
}

/// `usd_amount / price`. Unknown symbols yield exactly zero.
pub fn crypto_amount(usd_amount: Decimal, symbol: &str) -> Decimal {
    let price = price_of(symbol);
    if price.is_zero() {
        return Decimal::ZERO;
    }
    usd_amount.checked_div(price).unwrap_or(Decimal::ZERO)
}

/// A USD amount converted into one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub usd_amount: Decimal,
    pub token: String,
    pub crypto_amount: Decimal,
    /// `None` when the token is not in the price table.
    pub price: Option<Decimal>,
}

impl Quote {
    pub fn new(usd_amount: Decimal, token: &str) -> Self {
        Self {
            usd_amount,
            token: token.to_owned(),
            crypto_amount: crypto_amount(usd_amount, token),
            price: find_token(token).map(|t| t.price_usd),
        }
    }

    /// `0.061224 ETH`
    pub fn display(&self) -> String {
        format_crypto(self.crypto_amount, &self.token)
    }

    /// `1 ETH = $2450.00`
    pub fn rate(&self) -> Option<String> {
        self.price
            .map(|price| format!("1 {} = ${}", self.token, fixed(price, 2)))
    }
}

impl From<&Quote> for QuoteResponse {
    fn from(quote: &Quote) -> Self {
        QuoteResponse {
            usd_amount: quote.usd_amount,
            token: quote.token.clone(),
            crypto_amount: quote.crypto_amount,
            display: quote.display(),
            rate: quote.rate(),
        }
    }
}
