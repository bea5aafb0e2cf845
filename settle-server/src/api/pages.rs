//! Root-level views: the checkout link target and the success view.

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use kanau::processor::Processor;
use serde::Deserialize;
use settle_core::session::{CheckoutRequest, OpenSession};
use settle_core::settlement::SummarizeSession;
use settle_sdk::link::CheckoutQuery;
use uuid::Uuid;

use super::ApiError;
use crate::state::AppState;

/// `GET /payment-demo?amount=&orderId=&...` — open the checkout behind a
/// link.
///
/// Never rejects a link: missing or malformed parameters fall back to the
/// demo defaults. The returned session id is what the checkout view uses
/// for all further calls.
pub async fn payment_demo(
    state: State<AppState>,
    Query(query): Query<CheckoutQuery>,
) -> impl IntoResponse {
    let default_amount = state.config.simulator.get().default_amount;
    let request = CheckoutRequest::from_query(&query, default_amount);

    let merchant_key = state.config.merchant.get().public_key;
    if request
        .public_key
        .as_deref()
        .is_some_and(|pk| pk != merchant_key)
    {
        tracing::debug!(
            order_id = %request.order_id,
            "Checkout link carries a foreign public key"
        );
    }

    let Ok(session) = state.sessions.process(OpenSession { request }).await;
    Json(session)
}

#[derive(Debug, Deserialize)]
pub struct SuccessQuery {
    session: Uuid,
}

/// `GET {merchant.success_path}?session=<id>` — the success view data.
pub async fn payment_success(
    state: State<AppState>,
    Query(query): Query<SuccessQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state
        .sessions
        .process(SummarizeSession {
            session_id: query.session,
        })
        .await?;
    Ok(Json(summary))
}
