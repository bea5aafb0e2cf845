//! Checkout session handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use kanau::processor::Processor;
use settle_core::events::CloseReason;
use settle_core::session::{
    CloseSession, GetSession, ResetSimulation, SelectOption, TriggerSimulation,
};
use settle_core::settlement::SummarizeSession;
use settle_sdk::objects::SelectPaymentOption;
use uuid::Uuid;

use super::ApiError;
use crate::state::AppState;

pub(super) mod ws;

/// `GET /checkout/{session_id}`
pub(super) async fn get_session(
    state: State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.sessions.process(GetSession { session_id }).await?;
    Ok(Json(session))
}

/// `POST /checkout/{session_id}/selection` — change token and/or chain.
///
/// Only allowed while the payment is pending and no simulation is
/// running. Requotes and hands out a fresh address.
pub(super) async fn select_option(
    state: State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(body): Json<SelectPaymentOption>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .sessions
        .process(SelectOption {
            session_id,
            token: body.token,
            chain: body.chain,
        })
        .await?;
    Ok(Json(session))
}

/// `POST /checkout/{session_id}/simulate` — start the payment simulation.
pub(super) async fn simulate(
    state: State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .sessions
        .process(TriggerSimulation { session_id })
        .await?;
    Ok(Json(session))
}

/// `POST /checkout/{session_id}/reset` — cancel the run, back to pending.
pub(super) async fn reset(
    state: State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .sessions
        .process(ResetSimulation { session_id })
        .await?;
    Ok(Json(session))
}

/// `DELETE /checkout/{session_id}` — the customer left the checkout.
pub(super) async fn close_session(
    state: State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .sessions
        .process(CloseSession {
            session_id,
            reason: CloseReason::ClientLeft,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /checkout/{session_id}/summary`
pub(super) async fn summary(
    state: State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = state
        .sessions
        .process(SummarizeSession { session_id })
        .await?;
    Ok(Json(summary))
}
