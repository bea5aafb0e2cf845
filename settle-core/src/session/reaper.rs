//! SessionReaper processor.
//!
//! Periodically closes sessions nobody has touched for longer than the
//! configured TTL, and closes everything that is left on shutdown.

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info};

use super::SessionRegistry;
use crate::config::{ConfigStore, SimulatorConfig};
use crate::events::CloseReason;

pub struct SessionReaper {
    registry: SessionRegistry,
    config: ConfigStore<SimulatorConfig>,
    shutdown_rx: watch::Receiver<bool>,
}

impl SessionReaper {
    pub fn new(
        registry: SessionRegistry,
        config: ConfigStore<SimulatorConfig>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            registry,
            config,
            shutdown_rx,
        }
    }

    /// Run until the shutdown signal flips to `true`.
    pub async fn run(mut self) {
        let mut settings = self.config.get();
        let mut config_watcher = self.config.subscribe();
        let mut ticker = interval_at(Instant::now() + settings.sweep_interval, settings.sweep_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            ttl_secs = settings.session_ttl.as_secs(),
            sweep_secs = settings.sweep_interval.as_secs(),
            "SessionReaper started"
        );

        loop {
            tokio::select! {
                biased;

                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() || *self.shutdown_rx.borrow() {
                        info!("SessionReaper received shutdown signal");
                        break;
                    }
                }

                Ok(updated) = config_watcher.changed() => {
                    if updated.sweep_interval != settings.sweep_interval {
                        ticker = interval_at(
                            Instant::now() + updated.sweep_interval,
                            updated.sweep_interval,
                        );
                        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    }
                    info!(
                        ttl_secs = updated.session_ttl.as_secs(),
                        sweep_secs = updated.sweep_interval.as_secs(),
                        "SessionReaper picked up new settings"
                    );
                    settings = updated;
                }

                _ = ticker.tick() => {
                    let closed = self.registry.close_expired(settings.session_ttl).await;
                    if closed > 0 {
                        info!(closed, "Closed idle checkout sessions");
                    } else {
                        debug!("No idle checkout sessions");
                    }
                }
            }
        }

        let closed = self.registry.close_all(CloseReason::Shutdown).await;
        info!(closed, "SessionReaper shutdown complete");
    }
}
