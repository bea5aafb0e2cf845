use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use settle_core::pricing::Quote;
use settle_sdk::catalog::DEFAULT_TOKEN;
use settle_sdk::link::parse_amount;
use settle_sdk::objects::{ChainListing, QuoteResponse, TokenListing};

use crate::state::AppState;

/// `GET /tokens`
pub(super) async fn list_tokens() -> impl IntoResponse {
    Json(TokenListing::all())
}

/// `GET /chains`
pub(super) async fn list_chains() -> impl IntoResponse {
    Json(ChainListing::all())
}

#[derive(Debug, Deserialize)]
pub(super) struct QuoteParams {
    amount: Option<String>,
    token: Option<String>,
}

/// `GET /quote?amount=&token=` — convert a USD amount into a token.
///
/// Parsed as leniently as a checkout link: no amount means the demo
/// default, garbage means zero, an unknown token quotes to zero.
pub(super) async fn quote(
    state: State<AppState>,
    Query(params): Query<QuoteParams>,
) -> impl IntoResponse {
    let usd_amount = match params.amount.as_deref() {
        Some(raw) => parse_amount(raw),
        None => state.config.simulator.get().default_amount,
    };
    let token = params.token.as_deref().unwrap_or(DEFAULT_TOKEN.as_str());
    Json(QuoteResponse::from(&Quote::new(usd_amount, token)))
}
