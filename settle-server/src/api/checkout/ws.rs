use axum::{
    extract::{
        Path, State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use kanau::processor::Processor;
use settle_core::events::{CloseReason, SessionEvent};
use settle_core::session::{CloseSession, SessionError};
use settle_sdk::objects::ws::{WsCloseCode, WsServerMessage};
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use crate::state::AppState;

/// `GET /checkout/{session_id}/ws` — WebSocket status stream.
///
/// Upgrades the HTTP connection to a WebSocket and pushes
/// [`WsServerMessage`] JSON frames. The first frame is always the current
/// session; the connection is closed normally after the redirect frame.
/// If the client goes away before that, the session is closed with it.
pub(in crate::api) async fn session_ws(
    state: State<AppState>,
    Path(session_id): Path<Uuid>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let app_state = state.0.clone();
    ws.on_upgrade(move |socket| handle_session_ws(socket, app_state, session_id))
}

/// Background task that drives a single WebSocket connection.
///
/// 1. Sends the current session as the first message.
/// 2. If its run already finished, sends the redirect and closes.
/// 3. Otherwise relays status changes for this session until the
///    redirect, until the session is closed elsewhere, or until the client
///    disconnects.
async fn handle_session_ws(mut socket: WebSocket, state: AppState, session_id: Uuid) {
    // Subscribe *before* reading the session so that a status change
    // racing with the read is still in the receiver's buffer.
    let mut events = state.sessions.subscribe();

    match send_snapshot(&mut socket, &state, session_id).await {
        Snapshot::Sent => {}
        Snapshot::Finished => return,
        Snapshot::NotFound => {
            let _ = send_json(
                &mut socket,
                &WsServerMessage::Error {
                    code: WsCloseCode::SESSION_NOT_FOUND,
                    reason: "session not found".into(),
                },
            )
            .await;
            close_with(&mut socket, WsCloseCode::SESSION_NOT_FOUND, "session not found").await;
            return;
        }
        Snapshot::Disconnected => {
            leave(&state, session_id).await;
            return;
        }
    }

    loop {
        tokio::select! {
            result = events.recv() => {
                match result {
                    Ok(event) if event.session_id() == session_id => match event {
                        SessionEvent::StatusChanged { status, .. } => {
                            tracing::debug!(%session_id, %status, "WS: relaying status change");
                            match send_snapshot(&mut socket, &state, session_id).await {
                                Snapshot::Sent => {}
                                Snapshot::Finished => return,
                                Snapshot::NotFound => break,
                                Snapshot::Disconnected => {
                                    leave(&state, session_id).await;
                                    return;
                                }
                            }
                        }
                        SessionEvent::Redirect { location, .. } => {
                            let _ = send_json(&mut socket, &WsServerMessage::Redirect { location }).await;
                            close_with(&mut socket, WsCloseCode::NORMAL, "redirect").await;
                            return;
                        }
                        SessionEvent::Closed { reason, .. } => {
                            tracing::debug!(%session_id, %reason, "WS: session closed elsewhere");
                            close_with(&mut socket, WsCloseCode::GOING_AWAY, &reason.to_string()).await;
                            return;
                        }
                    },
                    Ok(_) => {
                        continue;
                    }
                    Err(RecvError::Lagged(n)) => {
                        tracing::warn!(
                            %session_id,
                            skipped = n,
                            "WS: event receiver lagged, resending current session"
                        );
                        match send_snapshot(&mut socket, &state, session_id).await {
                            Snapshot::Sent => {}
                            Snapshot::Finished => return,
                            Snapshot::NotFound => break,
                            Snapshot::Disconnected => {
                                leave(&state, session_id).await;
                                return;
                            }
                        }
                    }
                    Err(RecvError::Closed) => {
                        break;
                    }
                }
            }

            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => {
                        leave(&state, session_id).await;
                        return;
                    }
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    close_with(&mut socket, WsCloseCode::GOING_AWAY, "session closed").await;
}

enum Snapshot {
    /// Current state sent, keep relaying.
    Sent,
    /// The run had already finished; redirect sent and socket closed.
    Finished,
    NotFound,
    Disconnected,
}

async fn send_snapshot(socket: &mut WebSocket, state: &AppState, session_id: Uuid) -> Snapshot {
    let registry = &state.sessions;
    let snapshot = registry
        .with_session(session_id, |s| (s.to_response(), registry.redirect_location(s)))
        .await;
    let (session, location) = match snapshot {
        Ok(snapshot) => snapshot,
        Err(_) => return Snapshot::NotFound,
    };

    let finished = session.status.is_terminal() && !session.simulating;
    if send_json(socket, &WsServerMessage::StatusUpdate { session })
        .await
        .is_err()
    {
        return Snapshot::Disconnected;
    }

    if finished {
        let _ = send_json(socket, &WsServerMessage::Redirect { location }).await;
        close_with(socket, WsCloseCode::NORMAL, "redirect").await;
        return Snapshot::Finished;
    }
    Snapshot::Sent
}

/// The customer left the checkout view: drop the session and its timers.
async fn leave(state: &AppState, session_id: Uuid) {
    match state
        .sessions
        .process(CloseSession {
            session_id,
            reason: CloseReason::ClientLeft,
        })
        .await
    {
        Ok(()) => tracing::debug!(%session_id, "WS: client left, session closed"),
        Err(SessionError::NotFound(_)) => {}
        Err(e) => tracing::warn!(%session_id, error = %e, "WS: failed to close session"),
    }
}

async fn close_with(socket: &mut WebSocket, code: u16, reason: &str) {
    let _ = socket
        .send(Message::Close(Some(CloseFrame {
            code,
            reason: reason.into(),
        })))
        .await;
}

/// Serialize `value` as JSON and send it as a text WebSocket frame.
///
/// Returns `Err(())` if the send fails (client disconnected).
async fn send_json<T: serde::Serialize>(socket: &mut WebSocket, value: &T) -> Result<(), ()> {
    let json = serde_json::to_string(value).map_err(|_| ())?;
    socket
        .send(Message::Text(json.into()))
        .await
        .map_err(|_| ())
}
