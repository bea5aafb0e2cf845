//! Checkout status simulator.
//!
//! A simulated payment walks `pending -> detected -> confirmed` on fixed
//! delays once the customer presses "simulate", then asks for a redirect
//! to the success view. [`StatusMachine`] holds the rules; the
//! [`driver`] sleeps between steps and feeds them back through a
//! [`SimulationTarget`](driver::SimulationTarget).
//!
//! Every trigger and every reset starts a new *generation*. A timer only
//! applies steps for the generation it was started with, so a run that was
//! reset or closed can never touch the session again even if its task is
//! already past its last sleep.

pub mod driver;

pub use driver::{SimulationStep, SimulationTarget, run_simulation};

use settle_sdk::objects::PaymentStatus;
use std::time::Duration;
use thiserror::Error;

/// Delays of one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimulationTimings {
    /// From the simulate action to `detected`.
    pub detect_after: Duration,
    /// From `detected` to `confirmed`.
    pub confirm_after: Duration,
    /// From `confirmed` to the redirect.
    pub redirect_after: Duration,
}

impl Default for SimulationTimings {
    fn default() -> Self {
        Self {
            detect_after: Duration::from_secs(3),
            confirm_after: Duration::from_secs(2),
            redirect_after: Duration::from_secs(2),
        }
    }
}

impl SimulationTimings {
    /// Time from trigger to redirect.
    pub fn total(&self) -> Duration {
        self.detect_after + self.confirm_after + self.redirect_after
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("a simulation is already running")]
    AlreadyRunning,
    #[error("payment is already {0}")]
    NotPending(PaymentStatus),
    #[error("timer of generation {got} is stale, current generation is {current}")]
    StaleRun { got: u64, current: u64 },
    #[error("payment is already confirmed")]
    AlreadyConfirmed,
    #[error("payment is not confirmed yet")]
    NotConfirmed,
}

/// Payment status plus the bookkeeping that keeps timers honest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusMachine {
    status: PaymentStatus,
    generation: u64,
    running: bool,
}

impl StatusMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> PaymentStatus {
        self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a run is between its trigger and its redirect.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The explicit "simulate" action.
    ///
    /// Only allowed from an idle `pending` machine. Returns the
    /// generation the new run's timers must present.
    pub fn trigger(&mut self) -> Result<u64, TransitionError> {
        if self.running {
            return Err(TransitionError::AlreadyRunning);
        }
        if self.status != PaymentStatus::Pending {
            return Err(TransitionError::NotPending(self.status));
        }
        self.generation += 1;
        self.running = true;
        Ok(self.generation)
    }

    /// A timer of `generation` fired: move exactly one status forward.
    pub fn advance(&mut self, generation: u64) -> Result<PaymentStatus, TransitionError> {
        self.check_generation(generation)?;
        let next = self.status.next().ok_or(TransitionError::AlreadyConfirmed)?;
        self.status = next;
        Ok(next)
    }

    /// The redirect timer of `generation` fired: the run is over.
    pub fn finish(&mut self, generation: u64) -> Result<(), TransitionError> {
        self.check_generation(generation)?;
        if !self.status.is_terminal() {
            return Err(TransitionError::NotConfirmed);
        }
        self.running = false;
        Ok(())
    }

    /// Back to `pending`, cancelling any run in flight.
    ///
    /// Returns the previous status.
    pub fn reset(&mut self) -> PaymentStatus {
        let previous = self.status;
        self.generation += 1;
        self.running = false;
        self.status = PaymentStatus::Pending;
        previous
    }

    fn check_generation(&self, generation: u64) -> Result<(), TransitionError> {
        if !self.running || generation != self.generation {
            return Err(TransitionError::StaleRun {
                got: generation,
                current: self.generation,
            });
        }
        Ok(())
    }
}
