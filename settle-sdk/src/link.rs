//! The `/payment-demo` checkout link scheme.
//!
//! A merchant page hands checkout parameters to the hosted checkout by
//! appending them as query parameters:
//!
//! ```text
//! {base}/payment-demo?amount=150&currency=USD&orderId=ORDER-1&redirectUrl=...
//!     &token=ETH&chain=ethereum&description=...&pk=pk_demo
//! ```
//!
//! The scheme is a convention only. Nothing is signed or validated, and
//! every parameter except `orderId` and `pk` may be absent.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use url::{Url, form_urlencoded};

/// Path of the hosted checkout view.
pub const PAYMENT_PATH: &str = "/payment-demo";

/// Default path of the success view confirmed checkouts redirect to.
pub const SUCCESS_PATH: &str = "/payment-success";

/// Options a merchant passes when creating a checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutOptions {
    /// USD amount.
    pub amount: Decimal,
    #[serde(default)]
    pub currency: Option<String>,
    pub order_id: String,
    #[serde(default)]
    pub redirect_url: Option<String>,
    /// Preselected token symbol, e.g. `ETH`.
    #[serde(default)]
    pub token: Option<String>,
    /// Preselected chain id, e.g. `polygon`.
    #[serde(default)]
    pub chain: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl CheckoutOptions {
    pub fn new(amount: Decimal, order_id: impl Into<String>) -> Self {
        Self {
            amount,
            currency: None,
            order_id: order_id.into(),
            redirect_url: None,
            token: None,
            chain: None,
            description: None,
        }
    }
}

/// A created checkout: just the URL to send the customer to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub payment_url: String,
}

/// Options for [`Settle::new`].
#[derive(Debug, Clone)]
pub struct SettleInitOptions {
    pub public_key: String,
    /// Origin of the hosted checkout, e.g. `https://pay.example.com`.
    /// Without one the link is relative to the current origin.
    pub base_url: Option<String>,
}

/// Entry point of the merchant-side SDK.
#[derive(Debug, Clone)]
pub struct Settle {
    public_key: String,
    base_url: Option<String>,
}

impl Settle {
    pub fn new(options: SettleInitOptions) -> Self {
        Self {
            public_key: options.public_key,
            base_url: options.base_url,
        }
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Build the hosted checkout URL for `opts`.
    ///
    /// No request is made; the demo has no invoice API behind the link.
    pub fn create_invoice(&self, opts: &CheckoutOptions) -> Invoice {
        let base = self.base_url.as_deref().unwrap_or("");
        Invoice {
            payment_url: checkout_link(base, &self.public_key, opts),
        }
    }
}

/// Append the checkout parameters to `{base}/payment-demo`.
///
/// `base` is used as given apart from one trailing `/`; an empty base
/// yields a link relative to the current origin.
pub fn checkout_link(base: &str, public_key: &str, opts: &CheckoutOptions) -> String {
    let base = base.strip_suffix('/').unwrap_or(base);

    let mut query = form_urlencoded::Serializer::new(String::new());
    query.append_pair("amount", &opts.amount.normalize().to_string());
    if let Some(currency) = &opts.currency {
        query.append_pair("currency", currency);
    }
    query.append_pair("orderId", &opts.order_id);
    if let Some(redirect_url) = &opts.redirect_url {
        query.append_pair("redirectUrl", redirect_url);
    }
    if let Some(token) = &opts.token {
        query.append_pair("token", token);
    }
    if let Some(chain) = &opts.chain {
        query.append_pair("chain", chain);
    }
    if let Some(description) = &opts.description {
        query.append_pair("description", description);
    }
    query.append_pair("pk", public_key);

    format!("{base}{PAYMENT_PATH}?{}", query.finish())
}

/// Raw query parameters as received by the hosted checkout.
///
/// Every field is kept as the string the browser sent; interpretation
/// (defaults, lenient number parsing) happens in the accessor methods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutQuery {
    pub amount: Option<String>,
    pub currency: Option<String>,
    pub order_id: Option<String>,
    pub redirect_url: Option<String>,
    pub token: Option<String>,
    pub chain: Option<String>,
    pub description: Option<String>,
    pub pk: Option<String>,
}

impl CheckoutQuery {
    /// Read the parameters back out of a checkout URL.
    pub fn from_url(url: &Url) -> Self {
        let mut query = Self::default();
        for (key, value) in url.query_pairs() {
            let value = Some(value.into_owned());
            match key.as_ref() {
                "amount" => query.amount = value,
                "currency" => query.currency = value,
                "orderId" => query.order_id = value,
                "redirectUrl" => query.redirect_url = value,
                "token" => query.token = value,
                "chain" => query.chain = value,
                "description" => query.description = value,
                "pk" => query.pk = value,
                _ => {}
            }
        }
        query
    }

    /// The USD amount.
    ///
    /// Absent means `default`. Anything that does not parse as a
    /// non-negative number is coerced to zero.
    pub fn usd_amount(&self, default: Decimal) -> Decimal {
        match self.amount.as_deref() {
            None => default,
            Some(raw) => parse_amount(raw),
        }
    }
}

/// Lenient amount parsing: garbage and negatives become zero.
pub fn parse_amount(raw: &str) -> Decimal {
    let raw = raw.trim();
    let parsed = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .unwrap_or(Decimal::ZERO);
    if parsed.is_sign_negative() {
        Decimal::ZERO
    } else {
        parsed
    }
}
