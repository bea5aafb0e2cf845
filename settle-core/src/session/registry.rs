//! In-memory session registry and its commands.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use kanau::processor::Processor;
use settle_sdk::catalog::Chain;
use settle_sdk::objects::{CheckoutSessionResponse, PaymentStatus};
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use super::{CheckoutRequest, CheckoutSession, SessionError};
use crate::config::SharedConfig;
use crate::events::{CloseReason, SessionEvent, SessionEventReceiver, SessionEventSender};
use crate::simulator::{SimulationStep, SimulationTarget, run_simulation};

struct SessionEntry {
    session: CheckoutSession,
    timer: Option<JoinHandle<()>>,
}

impl SessionEntry {
    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

struct RegistryInner {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
    events: SessionEventSender,
    config: SharedConfig,
}

/// All open checkout sessions.
///
/// Cheap to clone; clones share the same sessions.
#[derive(Clone)]
pub struct SessionRegistry {
    inner: Arc<RegistryInner>,
}

impl SessionRegistry {
    pub fn new(config: SharedConfig, events: SessionEventSender) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                sessions: RwLock::new(HashMap::new()),
                events,
                config,
            }),
        }
    }

    pub fn config(&self) -> &SharedConfig {
        &self.inner.config
    }

    /// Receive every session event published after this call.
    pub fn subscribe(&self) -> SessionEventReceiver {
        self.inner.events.subscribe()
    }

    pub async fn len(&self) -> usize {
        self.inner.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Run `f` on a session, counting it as activity.
    pub async fn with_session<R>(
        &self,
        session_id: Uuid,
        f: impl FnOnce(&CheckoutSession) -> R,
    ) -> Result<R, SessionError> {
        let mut sessions = self.inner.sessions.write().await;
        let entry = sessions
            .get_mut(&session_id)
            .ok_or(SessionError::NotFound(session_id))?;
        entry.session.touch();
        Ok(f(&entry.session))
    }

    /// Close every session idle for longer than `ttl`.
    pub async fn close_expired(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.inner.sessions.write().await;
        let expired: Vec<Uuid> = sessions
            .iter()
            .filter(|(_, entry)| now.saturating_duration_since(entry.session.last_activity) > ttl)
            .map(|(id, _)| *id)
            .collect();

        for session_id in &expired {
            if let Some(entry) = sessions.remove(session_id) {
                self.discard(entry, CloseReason::Expired);
            }
        }
        expired.len()
    }

    /// Close every session, e.g. on shutdown.
    pub async fn close_all(&self, reason: CloseReason) -> usize {
        let mut sessions = self.inner.sessions.write().await;
        let count = sessions.len();
        for (_, entry) in sessions.drain() {
            self.discard(entry, reason);
        }
        count
    }

    fn discard(&self, mut entry: SessionEntry, reason: CloseReason) {
        entry.cancel_timer();
        let session_id = entry.session.id;
        debug!(%session_id, %reason, "Checkout session closed");
        self.publish(SessionEvent::Closed { session_id, reason });
    }

    fn publish(&self, event: SessionEvent) {
        // Nobody listening is fine; events are only a view refresh hint.
        let _ = self.inner.events.send(event);
    }

    /// Where the customer goes once a run of `session` has finished.
    pub fn redirect_location(&self, session: &CheckoutSession) -> String {
        match &session.request.redirect_url {
            Some(url) => url.clone(),
            None => {
                let merchant = self.inner.config.merchant.get();
                format!("{}?session={}", merchant.success_path, session.id)
            }
        }
    }
}

impl SimulationTarget for SessionRegistry {
    async fn apply(&self, session_id: Uuid, generation: u64, step: SimulationStep) -> bool {
        let mut sessions = self.inner.sessions.write().await;
        let Some(entry) = sessions.get_mut(&session_id) else {
            return false;
        };
        let session = &mut entry.session;

        match step {
            SimulationStep::Advance => match session.machine.advance(generation) {
                Ok(status) => {
                    if status == PaymentStatus::Confirmed {
                        session.confirmed_at = Some(Instant::now());
                        session.confirmed_at_utc = Some(OffsetDateTime::now_utc());
                    }
                    info!(%session_id, %status, "Payment status changed");
                    self.publish(SessionEvent::StatusChanged { session_id, status });
                    true
                }
                Err(e) => {
                    debug!(%session_id, generation, error = %e, "Dropped simulation step");
                    false
                }
            },
            SimulationStep::Redirect => match session.machine.finish(generation) {
                Ok(()) => {
                    let location = self.redirect_location(session);
                    // The run ends here; its handle is no longer worth aborting.
                    entry.timer = None;
                    info!(%session_id, %location, "Redirecting to success view");
                    self.publish(SessionEvent::Redirect {
                        session_id,
                        location,
                    });
                    true
                }
                Err(e) => {
                    debug!(%session_id, generation, error = %e, "Dropped simulation redirect");
                    false
                }
            },
        }
    }
}

/// Open a new pending session.
#[derive(Debug, Clone)]
pub struct OpenSession {
    pub request: CheckoutRequest,
}

impl Processor<OpenSession> for SessionRegistry {
    type Output = CheckoutSessionResponse;
    type Error = Infallible;

    async fn process(&self, cmd: OpenSession) -> Result<CheckoutSessionResponse, Infallible> {
        let session = CheckoutSession::open(cmd.request);
        let response = session.to_response();
        info!(
            session_id = %session.id,
            order_id = %session.request.order_id,
            usd_amount = %session.request.usd_amount,
            token = %session.request.token,
            chain = %session.request.chain,
            "Checkout session opened"
        );
        self.inner.sessions.write().await.insert(
            session.id,
            SessionEntry {
                session,
                timer: None,
            },
        );
        Ok(response)
    }
}

/// Current state of a session.
#[derive(Debug, Clone, Copy)]
pub struct GetSession {
    pub session_id: Uuid,
}

impl Processor<GetSession> for SessionRegistry {
    type Output = CheckoutSessionResponse;
    type Error = SessionError;

    async fn process(&self, cmd: GetSession) -> Result<CheckoutSessionResponse, SessionError> {
        self.with_session(cmd.session_id, CheckoutSession::to_response)
            .await
    }
}

/// Change token and/or chain before the payment is simulated.
#[derive(Debug, Clone)]
pub struct SelectOption {
    pub session_id: Uuid,
    pub token: Option<String>,
    pub chain: Option<Chain>,
}

impl Processor<SelectOption> for SessionRegistry {
    type Output = CheckoutSessionResponse;
    type Error = SessionError;

    async fn process(&self, cmd: SelectOption) -> Result<CheckoutSessionResponse, SessionError> {
        let mut sessions = self.inner.sessions.write().await;
        let entry = sessions
            .get_mut(&cmd.session_id)
            .ok_or(SessionError::NotFound(cmd.session_id))?;
        let session = &mut entry.session;
        session.touch();

        if session.machine.is_running() {
            return Err(SessionError::SelectionWhileRunning);
        }
        if session.status() != PaymentStatus::Pending {
            return Err(SessionError::SelectionLocked(session.status()));
        }

        session.reselect(cmd.token, cmd.chain);
        debug!(
            session_id = %cmd.session_id,
            token = %session.request.token,
            chain = %session.request.chain,
            "Payment option changed"
        );
        Ok(session.to_response())
    }
}

/// The explicit "simulate payment" action.
#[derive(Debug, Clone, Copy)]
pub struct TriggerSimulation {
    pub session_id: Uuid,
}

impl Processor<TriggerSimulation> for SessionRegistry {
    type Output = CheckoutSessionResponse;
    type Error = SessionError;

    async fn process(
        &self,
        cmd: TriggerSimulation,
    ) -> Result<CheckoutSessionResponse, SessionError> {
        let timings = self.inner.config.simulator.get().timings;
        let mut sessions = self.inner.sessions.write().await;
        let entry = sessions
            .get_mut(&cmd.session_id)
            .ok_or(SessionError::NotFound(cmd.session_id))?;
        entry.session.touch();

        let generation = entry.session.machine.trigger()?;
        entry.session.started_at = Some(Instant::now());
        entry.session.confirmed_at = None;
        entry.session.confirmed_at_utc = None;

        entry.cancel_timer();
        entry.timer = Some(tokio::spawn(run_simulation(
            self.clone(),
            cmd.session_id,
            generation,
            timings,
        )));

        info!(session_id = %cmd.session_id, generation, "Payment simulation started");
        Ok(entry.session.to_response())
    }
}

/// Cancel any run and go back to `pending`.
#[derive(Debug, Clone, Copy)]
pub struct ResetSimulation {
    pub session_id: Uuid,
}

impl Processor<ResetSimulation> for SessionRegistry {
    type Output = CheckoutSessionResponse;
    type Error = SessionError;

    async fn process(&self, cmd: ResetSimulation) -> Result<CheckoutSessionResponse, SessionError> {
        let mut sessions = self.inner.sessions.write().await;
        let entry = sessions
            .get_mut(&cmd.session_id)
            .ok_or(SessionError::NotFound(cmd.session_id))?;
        entry.cancel_timer();

        let session = &mut entry.session;
        session.touch();
        let previous = session.machine.reset();
        session.started_at = None;
        session.confirmed_at = None;
        session.confirmed_at_utc = None;

        info!(session_id = %cmd.session_id, %previous, "Payment simulation reset");
        self.publish(SessionEvent::StatusChanged {
            session_id: cmd.session_id,
            status: PaymentStatus::Pending,
        });
        Ok(session.to_response())
    }
}

/// Discard a session and cancel its timer.
#[derive(Debug, Clone, Copy)]
pub struct CloseSession {
    pub session_id: Uuid,
    pub reason: CloseReason,
}

impl Processor<CloseSession> for SessionRegistry {
    type Output = ();
    type Error = SessionError;

    async fn process(&self, cmd: CloseSession) -> Result<(), SessionError> {
        let entry = self
            .inner
            .sessions
            .write()
            .await
            .remove(&cmd.session_id)
            .ok_or(SessionError::NotFound(cmd.session_id))?;
        self.discard(entry, cmd.reason);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::{MerchantConfig, ServerConfig, SimulatorConfig};
    use crate::events::session_event_channel;
    use crate::simulator::TransitionError;
    use rust_decimal::Decimal;
    use settle_sdk::link::CheckoutQuery;
    use tokio::sync::broadcast::error::TryRecvError;

    pub(crate) fn test_config() -> SharedConfig {
        SharedConfig::new(
            ServerConfig {
                listen: "127.0.0.1:0".parse().unwrap(),
                public_base_url: "http://localhost:8080".parse().unwrap(),
            },
            SimulatorConfig::default(),
            MerchantConfig::new("Demo Store".into(), "pk_demo".into()),
        )
    }

    pub(crate) fn test_registry() -> SessionRegistry {
        let (tx, _rx) = session_event_channel();
        SessionRegistry::new(test_config(), tx)
    }

    pub(crate) async fn open(registry: &SessionRegistry, query: CheckoutQuery) -> Uuid {
        let request = CheckoutRequest::from_query(&query, Decimal::new(150, 0));
        let Ok(response) = registry.process(OpenSession { request }).await;
        response.session_id
    }

    fn assert_near(elapsed: Duration, secs: u64) {
        let expected = Duration::from_secs(secs);
        assert!(
            elapsed >= expected && elapsed < expected + Duration::from_millis(50),
            "{elapsed:?} is not {expected:?}"
        );
    }

    fn status_of(event: SessionEvent) -> PaymentStatus {
        match event {
            SessionEvent::StatusChanged { status, .. } => status,
            other => panic!("expected status change, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulation_sequence_and_timing() {
        let registry = test_registry();
        let session_id = open(&registry, CheckoutQuery::default()).await;
        let mut rx = registry.subscribe();

        let start = Instant::now();
        let response = registry
            .process(TriggerSimulation { session_id })
            .await
            .unwrap();
        assert!(response.simulating);
        assert_eq!(response.status, PaymentStatus::Pending);

        assert_eq!(status_of(rx.recv().await.unwrap()), PaymentStatus::Detected);
        assert_near(start.elapsed(), 3);
        assert_eq!(status_of(rx.recv().await.unwrap()), PaymentStatus::Confirmed);
        assert_near(start.elapsed(), 5);

        match rx.recv().await.unwrap() {
            SessionEvent::Redirect { location, .. } => {
                assert_eq!(location, format!("/payment-success?session={session_id}"));
            }
            other => panic!("expected redirect, got {other:?}"),
        }
        assert_near(start.elapsed(), 7);

        let response = registry.process(GetSession { session_id }).await.unwrap();
        assert_eq!(response.status, PaymentStatus::Confirmed);
        assert!(!response.simulating);
    }

    #[tokio::test(start_paused = true)]
    async fn test_redirect_uses_link_url() {
        let registry = test_registry();
        let session_id = open(
            &registry,
            CheckoutQuery {
                redirect_url: Some("https://shop.example.com/thanks".into()),
                ..Default::default()
            },
        )
        .await;
        let mut rx = registry.subscribe();
        registry
            .process(TriggerSimulation { session_id })
            .await
            .unwrap();

        let location = loop {
            if let SessionEvent::Redirect { location, .. } = rx.recv().await.unwrap() {
                break location;
            }
        };
        assert_eq!(location, "https://shop.example.com/thanks");
    }

    #[tokio::test(start_paused = true)]
    async fn test_retrigger_is_rejected() {
        let registry = test_registry();
        let session_id = open(&registry, CheckoutQuery::default()).await;
        registry
            .process(TriggerSimulation { session_id })
            .await
            .unwrap();

        let err = registry
            .process(TriggerSimulation { session_id })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Transition(TransitionError::AlreadyRunning)
        ));

        tokio::time::sleep(Duration::from_secs(10)).await;
        let err = registry
            .process(TriggerSimulation { session_id })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Transition(TransitionError::NotPending(PaymentStatus::Confirmed))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_cancels_run_and_allows_retrigger() {
        let registry = test_registry();
        let session_id = open(&registry, CheckoutQuery::default()).await;
        let mut rx = registry.subscribe();

        registry
            .process(TriggerSimulation { session_id })
            .await
            .unwrap();
        assert_eq!(status_of(rx.recv().await.unwrap()), PaymentStatus::Detected);

        let response = registry
            .process(ResetSimulation { session_id })
            .await
            .unwrap();
        assert_eq!(response.status, PaymentStatus::Pending);
        assert!(!response.simulating);
        assert_eq!(status_of(rx.recv().await.unwrap()), PaymentStatus::Pending);

        // The cancelled run must not confirm anything.
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
        let response = registry.process(GetSession { session_id }).await.unwrap();
        assert_eq!(response.status, PaymentStatus::Pending);

        registry
            .process(TriggerSimulation { session_id })
            .await
            .unwrap();
        assert_eq!(status_of(rx.recv().await.unwrap()), PaymentStatus::Detected);
        assert_eq!(status_of(rx.recv().await.unwrap()), PaymentStatus::Confirmed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_generation_never_applies() {
        let registry = test_registry();
        let session_id = open(&registry, CheckoutQuery::default()).await;

        registry
            .process(TriggerSimulation { session_id })
            .await
            .unwrap();
        registry
            .process(ResetSimulation { session_id })
            .await
            .unwrap();
        registry
            .process(TriggerSimulation { session_id })
            .await
            .unwrap();

        // Generation 1 belongs to the reset run.
        assert!(
            !registry
                .apply(session_id, 1, SimulationStep::Advance)
                .await
        );
        let response = registry.process(GetSession { session_id }).await.unwrap();
        assert_eq!(response.status, PaymentStatus::Pending);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_cancels_timer() {
        let registry = test_registry();
        let session_id = open(&registry, CheckoutQuery::default()).await;
        let mut rx = registry.subscribe();

        registry
            .process(TriggerSimulation { session_id })
            .await
            .unwrap();
        registry
            .process(CloseSession {
                session_id,
                reason: CloseReason::ClientLeft,
            })
            .await
            .unwrap();

        assert_eq!(
            rx.recv().await.unwrap(),
            SessionEvent::Closed {
                session_id,
                reason: CloseReason::ClientLeft
            }
        );
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
        assert!(matches!(
            registry.process(GetSession { session_id }).await,
            Err(SessionError::NotFound(_))
        ));
        assert!(matches!(
            registry
                .process(CloseSession {
                    session_id,
                    reason: CloseReason::ClientLeft
                })
                .await,
            Err(SessionError::NotFound(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_selection_locked_once_triggered() {
        let registry = test_registry();
        let session_id = open(&registry, CheckoutQuery::default()).await;

        let response = registry
            .process(SelectOption {
                session_id,
                token: Some("SOL".into()),
                chain: Some(Chain::Solana),
            })
            .await
            .unwrap();
        assert_eq!(response.token, "SOL");
        assert_eq!(response.crypto_display, "1.153846 SOL");

        registry
            .process(TriggerSimulation { session_id })
            .await
            .unwrap();
        let select = SelectOption {
            session_id,
            token: Some("USDC".into()),
            chain: None,
        };
        assert!(matches!(
            registry.process(select.clone()).await,
            Err(SessionError::SelectionWhileRunning)
        ));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(matches!(
            registry.process(select).await,
            Err(SessionError::SelectionLocked(PaymentStatus::Confirmed))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_expired() {
        let registry = test_registry();
        let idle = open(&registry, CheckoutQuery::default()).await;
        tokio::time::sleep(Duration::from_secs(20 * 60)).await;
        let active = open(&registry, CheckoutQuery::default()).await;
        tokio::time::sleep(Duration::from_secs(11 * 60)).await;

        assert_eq!(registry.close_expired(Duration::from_secs(30 * 60)).await, 1);
        assert!(registry.process(GetSession { session_id: idle }).await.is_err());
        assert!(registry.process(GetSession { session_id: active }).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_all() {
        let registry = test_registry();
        let first = open(&registry, CheckoutQuery::default()).await;
        open(&registry, CheckoutQuery::default()).await;
        registry
            .process(TriggerSimulation { session_id: first })
            .await
            .unwrap();

        let mut rx = registry.subscribe();
        assert_eq!(registry.close_all(CloseReason::Shutdown).await, 2);
        assert!(registry.is_empty().await);

        let mut closed = 0;
        while let Ok(event) = rx.try_recv() {
            assert!(matches!(
                event,
                SessionEvent::Closed {
                    reason: CloseReason::Shutdown,
                    ..
                }
            ));
            closed += 1;
        }
        assert_eq!(closed, 2);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }
}
