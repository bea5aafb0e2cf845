use axum::{Json, extract::State, response::IntoResponse};
use settle_sdk::link::{CheckoutOptions, Settle, SettleInitOptions};

use crate::state::AppState;

/// `POST /invoices` — build a checkout link for this server.
///
/// Uses the configured merchant public key and public base URL. Nothing
/// is stored; the session only exists once the link is opened.
pub(super) async fn create_invoice(
    state: State<AppState>,
    Json(opts): Json<CheckoutOptions>,
) -> impl IntoResponse {
    let merchant = state.config.merchant.get();
    let server = state.config.server.get();

    let settle = Settle::new(SettleInitOptions {
        public_key: merchant.public_key,
        base_url: Some(server.public_base_url.to_string()),
    });
    let invoice = settle.create_invoice(&opts);

    tracing::debug!(
        order_id = %opts.order_id,
        payment_url = %invoice.payment_url,
        "Checkout link created"
    );
    Json(invoice)
}
