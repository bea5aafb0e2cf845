//! HTTP API handlers.
//!
//! # Endpoints (under `/api/v1`)
//!
//! - `GET    /tokens`                          – token catalog with USD prices
//! - `GET    /chains`                          – chain catalog
//! - `GET    /quote?amount=&token=`            – convert a USD amount
//! - `POST   /invoices`                        – build a checkout link
//! - `GET    /checkout/{session_id}`           – current session state
//! - `DELETE /checkout/{session_id}`           – leave the checkout view
//! - `POST   /checkout/{session_id}/selection` – change token / chain
//! - `POST   /checkout/{session_id}/simulate`  – start the payment simulation
//! - `POST   /checkout/{session_id}/reset`     – back to pending
//! - `GET    /checkout/{session_id}/summary`   – settlement summary
//! - `GET    /checkout/{session_id}/ws`        – WebSocket status stream
//! - `GET    /merchant/transactions?status=`   – static transaction list
//! - `GET    /merchant/stats`                  – static dashboard numbers
//!
//! The checkout link itself (`/payment-demo`) and the success view
//! (`merchant.success_path`) live at the root, see [`pages`].

use axum::{
    Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use settle_core::session::SessionError;

use crate::state::AppState;

mod catalog;
mod checkout;
mod invoices;
mod merchant;
pub mod pages;

/// Build the `/api/v1` router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tokens", get(catalog::list_tokens))
        .route("/chains", get(catalog::list_chains))
        .route("/quote", get(catalog::quote))
        .route("/invoices", post(invoices::create_invoice))
        .route(
            "/checkout/{session_id}",
            get(checkout::get_session).delete(checkout::close_session),
        )
        .route(
            "/checkout/{session_id}/selection",
            post(checkout::select_option),
        )
        .route("/checkout/{session_id}/simulate", post(checkout::simulate))
        .route("/checkout/{session_id}/reset", post(checkout::reset))
        .route("/checkout/{session_id}/summary", get(checkout::summary))
        .route("/checkout/{session_id}/ws", get(checkout::ws::session_ws))
        .route(
            "/merchant/transactions",
            get(merchant::list_transactions),
        )
        .route("/merchant/stats", get(merchant::stats))
}

// ---------------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------------

/// Errors that can occur in API handlers.
#[derive(Debug)]
pub(crate) enum ApiError {
    /// A session command failed.
    Session(SessionError),
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        ApiError::Session(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::Session(e @ SessionError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, e.to_string()).into_response()
            }
            ApiError::Session(e) => (StatusCode::CONFLICT, e.to_string()).into_response(),
        }
    }
}
