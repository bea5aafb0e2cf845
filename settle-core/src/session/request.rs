use rand::Rng;
use rand::distr::Alphanumeric;
use rust_decimal::Decimal;
use settle_sdk::catalog::{Chain, DEFAULT_CHAIN, DEFAULT_TOKEN};
use settle_sdk::link::CheckoutQuery;
use tracing::warn;

pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_DESCRIPTION: &str = "Demo Store Purchase";

/// What the merchant asked the customer to pay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub usd_amount: Decimal,
    pub currency: String,
    pub order_id: String,
    pub description: String,
    /// Token symbol exactly as requested; unknown symbols are kept and
    /// quote to zero.
    pub token: String,
    pub chain: Chain,
    pub redirect_url: Option<String>,
    pub public_key: Option<String>,
}

impl CheckoutRequest {
    /// Build a request from the checkout link parameters.
    ///
    /// Never fails. Missing values fall back to the demo defaults and an
    /// unusable amount becomes zero.
    pub fn from_query(query: &CheckoutQuery, default_amount: Decimal) -> Self {
        let chain = match query.chain.as_deref() {
            None => DEFAULT_CHAIN,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(chain = raw, "Unknown chain in checkout link, using default");
                DEFAULT_CHAIN
            }),
        };

        Self {
            usd_amount: query.usd_amount(default_amount),
            currency: non_empty(query.currency.as_deref())
                .unwrap_or(DEFAULT_CURRENCY)
                .to_owned(),
            order_id: non_empty(query.order_id.as_deref())
                .map(str::to_owned)
                .unwrap_or_else(generate_order_id),
            description: non_empty(query.description.as_deref())
                .unwrap_or(DEFAULT_DESCRIPTION)
                .to_owned(),
            token: non_empty(query.token.as_deref())
                .unwrap_or(DEFAULT_TOKEN.as_str())
                .to_owned(),
            chain,
            redirect_url: non_empty(query.redirect_url.as_deref()).map(str::to_owned),
            public_key: non_empty(query.pk.as_deref()).map(str::to_owned),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// `DEMO-` followed by 8 uppercase alphanumerics.
pub fn generate_order_id() -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect();
    format!("DEMO-{suffix}")
}
