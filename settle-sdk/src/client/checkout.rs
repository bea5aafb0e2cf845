//! Typed client for the checkout, catalog and merchant endpoints.

use reqwest::Client;
use rust_decimal::Decimal;
use url::Url;
use uuid::Uuid;

use super::{ClientError, SessionWatcher, parse_response};
use crate::link::{CheckoutOptions, Invoice};
use crate::objects::{
    ChainListing, CheckoutSessionResponse, DashboardStats, MockTransaction, QuoteResponse,
    SelectPaymentOption, SettlementSummary, TokenListing,
};

/// Typed HTTP client for the demo checkout server.
///
/// Mirrors what the checkout widget does: open a session from a
/// `/payment-demo` link, switch token or chain, trigger the simulation,
/// reset it, and close the session when leaving.
#[derive(Debug, Clone)]
pub struct SettleClient {
    http: Client,
    base_url: Url,
}

impl SettleClient {
    /// Create a new `SettleClient` for the server at `base_url`.
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `GET /api/v1/tokens`
    pub async fn list_tokens(&self) -> Result<Vec<TokenListing>, ClientError> {
        let url = self.base_url.join("/api/v1/tokens")?;
        parse_response(self.http.get(url).send().await?).await
    }

    /// `GET /api/v1/chains`
    pub async fn list_chains(&self) -> Result<Vec<ChainListing>, ClientError> {
        let url = self.base_url.join("/api/v1/chains")?;
        parse_response(self.http.get(url).send().await?).await
    }

    /// `GET /api/v1/quote` – convert a USD amount into `token`.
    pub async fn quote(&self, amount: Decimal, token: &str) -> Result<QuoteResponse, ClientError> {
        let mut url = self.base_url.join("/api/v1/quote")?;
        url.query_pairs_mut()
            .append_pair("amount", &amount.to_string())
            .append_pair("token", token);
        parse_response(self.http.get(url).send().await?).await
    }

    /// `POST /api/v1/invoices` – let the server build a payment link with
    /// the merchant key it is configured with.
    pub async fn create_invoice(&self, opts: &CheckoutOptions) -> Result<Invoice, ClientError> {
        let url = self.base_url.join("/api/v1/invoices")?;
        parse_response(self.http.post(url).json(opts).send().await?).await
    }

    /// Follow a payment link and open the checkout session behind it.
    ///
    /// Only the path and query of `payment_url` are used, so links built
    /// for another origin, or relative links, still open on this server.
    pub async fn open_checkout(
        &self,
        payment_url: &str,
    ) -> Result<CheckoutSessionResponse, ClientError> {
        let link = self.base_url.join(payment_url)?;
        let mut url = self.base_url.join(link.path())?;
        url.set_query(link.query());
        parse_response(self.http.get(url).send().await?).await
    }

    /// `GET /api/v1/checkout/{session_id}`
    pub async fn get_session(
        &self,
        session_id: Uuid,
    ) -> Result<CheckoutSessionResponse, ClientError> {
        let url = self.session_url(session_id, "")?;
        parse_response(self.http.get(url).send().await?).await
    }

    /// `POST /api/v1/checkout/{session_id}/selection`
    pub async fn select(
        &self,
        session_id: Uuid,
        option: &SelectPaymentOption,
    ) -> Result<CheckoutSessionResponse, ClientError> {
        let url = self.session_url(session_id, "/selection")?;
        parse_response(self.http.post(url).json(option).send().await?).await
    }

    /// `POST /api/v1/checkout/{session_id}/simulate`
    pub async fn simulate(
        &self,
        session_id: Uuid,
    ) -> Result<CheckoutSessionResponse, ClientError> {
        let url = self.session_url(session_id, "/simulate")?;
        parse_response(self.http.post(url).send().await?).await
    }

    /// `POST /api/v1/checkout/{session_id}/reset`
    pub async fn reset(&self, session_id: Uuid) -> Result<CheckoutSessionResponse, ClientError> {
        let url = self.session_url(session_id, "/reset")?;
        parse_response(self.http.post(url).send().await?).await
    }

    /// `DELETE /api/v1/checkout/{session_id}` – leave the checkout view.
    pub async fn close(&self, session_id: Uuid) -> Result<(), ClientError> {
        let url = self.session_url(session_id, "")?;
        let resp = self.http.delete(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api { status, body });
        }
        Ok(())
    }

    /// `GET /api/v1/checkout/{session_id}/summary`
    pub async fn summary(&self, session_id: Uuid) -> Result<SettlementSummary, ClientError> {
        let url = self.session_url(session_id, "/summary")?;
        parse_response(self.http.get(url).send().await?).await
    }

    /// `GET /api/v1/merchant/transactions`
    pub async fn transactions(
        &self,
        status: Option<&str>,
    ) -> Result<Vec<MockTransaction>, ClientError> {
        let mut url = self.base_url.join("/api/v1/merchant/transactions")?;
        if let Some(status) = status {
            url.query_pairs_mut().append_pair("status", status);
        }
        parse_response(self.http.get(url).send().await?).await
    }

    /// `GET /api/v1/merchant/stats`
    pub async fn stats(&self) -> Result<DashboardStats, ClientError> {
        let url = self.base_url.join("/api/v1/merchant/stats")?;
        parse_response(self.http.get(url).send().await?).await
    }

    /// Connect to the status stream of a session.
    pub async fn watch(&self, session_id: Uuid) -> Result<SessionWatcher, ClientError> {
        let mut url = self.session_url(session_id, "/ws")?;
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        // http -> ws and https -> wss are always valid scheme swaps
        let _ = url.set_scheme(scheme);
        SessionWatcher::connect(url.as_str()).await
    }

    fn session_url(&self, session_id: Uuid, suffix: &str) -> Result<Url, ClientError> {
        Ok(self
            .base_url
            .join(&format!("/api/v1/checkout/{session_id}{suffix}"))?)
    }
}
