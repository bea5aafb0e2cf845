//! Success view data for a confirmed checkout.

use kanau::processor::Processor;
use settle_sdk::format::{format_crypto, format_elapsed, format_usd};
use settle_sdk::objects::{PaymentStatus, SettlementSummary};
use uuid::Uuid;

use crate::config::MerchantConfig;
use crate::pricing::crypto_amount;
use crate::session::{CheckoutSession, SessionError, SessionRegistry};

/// Settle a confirmed session into the merchant's preferred token.
pub fn summarize(
    session: &CheckoutSession,
    merchant: &MerchantConfig,
) -> Result<SettlementSummary, SessionError> {
    let status = session.status();
    if status != PaymentStatus::Confirmed {
        return Err(SessionError::NotConfirmed(status));
    }

    let settlement_token = merchant.settlement_token.as_str();
    let settlement_amount = crypto_amount(session.request.usd_amount, settlement_token);

    Ok(SettlementSummary {
        session_id: session.id,
        order_id: session.request.order_id.clone(),
        amount: format_usd(session.request.usd_amount),
        customer_payment: format!(
            "{} on {}",
            session.quote.display(),
            session.request.chain.name()
        ),
        source_chain: session.request.chain,
        settlement_amount,
        settlement_display: format_crypto(settlement_amount, settlement_token),
        settlement_token: settlement_token.to_owned(),
        settlement_chain: merchant.settlement_chain,
        processing_time: format_elapsed(session.processing_secs().unwrap_or(0)),
        payment_address: session.payment_address.clone(),
        confirmed_at: session
            .confirmed_at_utc
            .unwrap_or(session.created_at)
            .unix_timestamp(),
    })
}

/// Settlement summary of a confirmed session.
#[derive(Debug, Clone, Copy)]
pub struct SummarizeSession {
    pub session_id: Uuid,
}

impl Processor<SummarizeSession> for SessionRegistry {
    type Output = SettlementSummary;
    type Error = SessionError;

    async fn process(&self, cmd: SummarizeSession) -> Result<SettlementSummary, SessionError> {
        let merchant = self.config().merchant.get();
        self.with_session(cmd.session_id, |session| summarize(session, &merchant))
            .await?
    }
}
