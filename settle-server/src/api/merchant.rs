use axum::{Json, extract::Query, response::IntoResponse};
use serde::Deserialize;
use settle_core::ledger::{dashboard_stats, mock_transactions, transactions_with_status};

#[derive(Debug, Deserialize)]
pub(super) struct TransactionFilter {
    status: Option<String>,
}

/// `GET /merchant/transactions[?status=]`
pub(super) async fn list_transactions(
    Query(filter): Query<TransactionFilter>,
) -> impl IntoResponse {
    let transactions = match filter.status.as_deref() {
        Some(status) => transactions_with_status(status),
        None => mock_transactions(),
    };
    Json(transactions)
}

/// `GET /merchant/stats`
pub(super) async fn stats() -> impl IntoResponse {
    Json(dashboard_stats())
}
