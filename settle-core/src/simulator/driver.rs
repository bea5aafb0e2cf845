//! Timer task driving one simulation run.

use super::SimulationTimings;
use std::future::Future;
use tracing::debug;
use uuid::Uuid;

/// One step a run asks its target to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationStep {
    /// Move the payment status one step forward.
    Advance,
    /// The run is over; send the customer to the success view.
    Redirect,
}

/// Whatever holds the state a run mutates.
pub trait SimulationTarget: Send + Sync + 'static {
    /// Apply `step` for `generation`.
    ///
    /// Returns `false` when the step was rejected (stale generation,
    /// session gone), which ends the run.
    fn apply(
        &self,
        session_id: Uuid,
        generation: u64,
        step: SimulationStep,
    ) -> impl Future<Output = bool> + Send;
}

/// Sleep through the delays of `timings`, applying one step after each.
///
/// The run is meant to be spawned and aborted on reset or close; the
/// generation check in the target covers the window where an abort races
/// a step that is already being applied.
pub async fn run_simulation<T: SimulationTarget>(
    target: T,
    session_id: Uuid,
    generation: u64,
    timings: SimulationTimings,
) {
    let schedule = [
        (timings.detect_after, SimulationStep::Advance),
        (timings.confirm_after, SimulationStep::Advance),
        (timings.redirect_after, SimulationStep::Redirect),
    ];

    for (delay, step) in schedule {
        tokio::time::sleep(delay).await;
        if !target.apply(session_id, generation, step).await {
            debug!(%session_id, generation, ?step, "Simulation step rejected, ending run");
            return;
        }
    }

    debug!(%session_id, generation, "Simulation run complete");
}
