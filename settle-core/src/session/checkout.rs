use settle_sdk::catalog::Chain;
use settle_sdk::objects::{CheckoutSessionResponse, PaymentStatus};
use time::OffsetDateTime;
use tokio::time::Instant;
use uuid::Uuid;

use super::CheckoutRequest;
use crate::address::generate_payment_address;
use crate::pricing::Quote;
use crate::simulator::StatusMachine;

/// Server-held state of one open checkout view.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub id: Uuid,
    pub request: CheckoutRequest,
    pub quote: Quote,
    pub payment_address: String,
    pub machine: StatusMachine,
    pub created_at: OffsetDateTime,
    pub last_activity: Instant,
    /// When the current run was triggered.
    pub started_at: Option<Instant>,
    /// When the current run reached `confirmed`.
    pub confirmed_at: Option<Instant>,
    pub confirmed_at_utc: Option<OffsetDateTime>,
}

impl CheckoutSession {
    pub fn open(request: CheckoutRequest) -> Self {
        let quote = Quote::new(request.usd_amount, &request.token);
        Self {
            id: Uuid::new_v4(),
            request,
            quote,
            payment_address: generate_payment_address(),
            machine: StatusMachine::new(),
            created_at: OffsetDateTime::now_utc(),
            last_activity: Instant::now(),
            started_at: None,
            confirmed_at: None,
            confirmed_at_utc: None,
        }
    }

    pub fn status(&self) -> PaymentStatus {
        self.machine.status()
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Switch token and/or chain. Requotes and hands out a new address.
    pub fn reselect(&mut self, token: Option<String>, chain: Option<Chain>) {
        if let Some(token) = token {
            self.request.token = token;
        }
        if let Some(chain) = chain {
            self.request.chain = chain;
        }
        self.quote = Quote::new(self.request.usd_amount, &self.request.token);
        self.payment_address = generate_payment_address();
    }

    /// Seconds from trigger to confirmation of the current run.
    pub fn processing_secs(&self) -> Option<u64> {
        let started = self.started_at?;
        let confirmed = self.confirmed_at?;
        Some(confirmed.saturating_duration_since(started).as_secs())
    }

    pub fn to_response(&self) -> CheckoutSessionResponse {
        let status = self.status();
        CheckoutSessionResponse {
            session_id: self.id,
            order_id: self.request.order_id.clone(),
            description: self.request.description.clone(),
            currency: self.request.currency.clone(),
            usd_amount: self.request.usd_amount,
            token: self.quote.token.clone(),
            chain: self.request.chain,
            crypto_amount: self.quote.crypto_amount,
            crypto_display: self.quote.display(),
            rate: self.quote.rate(),
            payment_address: self.payment_address.clone(),
            status,
            status_message: status.message().to_owned(),
            simulating: self.machine.is_running(),
            redirect_url: self.request.redirect_url.clone(),
            created_at: self.created_at.unix_timestamp(),
        }
    }
}
