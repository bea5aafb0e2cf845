//! Simulator configuration.

use crate::simulator::SimulationTimings;
use rust_decimal::Decimal;
use std::time::Duration;

/// How checkout sessions are simulated and how long they live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatorConfig {
    /// Delays of the status sequence.
    pub timings: SimulationTimings,
    /// Sessions idle for longer than this are closed by the reaper.
    pub session_ttl: Duration,
    /// How often the reaper looks for idle sessions.
    pub sweep_interval: Duration,
    /// USD amount used when a checkout link carries no `amount`.
    pub default_amount: Decimal,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            timings: SimulationTimings::default(),
            session_ttl: Duration::from_secs(30 * 60),
            sweep_interval: Duration::from_secs(60),
            default_amount: Decimal::new(15000, 2),
        }
    }
}
