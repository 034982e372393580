//! The external traffic simulator seam.
//!
//! # Pluggability
//!
//! [`TrafficDistributionModel`](crate::TrafficDistributionModel) calls the
//! simulator through the [`TrafficSimulator`] trait, so a real traffic-flow
//! engine, a recorded replay, or a test double all plug in the same way.
//!
//! # Console output
//!
//! Simulators tend to be chatty.  Each implementation writes through a
//! [`Console`] it owns; the model wraps every call in a [`ConsoleGuard`],
//! which swaps the console for a sink and puts the original back when
//! dropped, whether the call succeeded or not.

use std::io::{self, Write};
use std::ops::{Deref, DerefMut};

use thiserror::Error;

use br_core::Tick;

use crate::{NetworkState, TravelTimeRecord, TripRow};

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("simulator exited with status {status}: {message}")]
    Failed { status: i32, message: String },

    #[error("malformed simulator output: {0}")]
    Malformed(String),

    #[error("simulator I/O error: {0}")]
    Io(#[from] io::Error),
}

// ── Console ───────────────────────────────────────────────────────────────────

/// Replaceable output stream of a simulator.  Defaults to stdout.
pub struct Console(Box<dyn Write + Send>);

impl Console {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self(out)
    }

    /// Install `out` and return the previous stream.
    pub fn replace(&mut self, out: Box<dyn Write + Send>) -> Box<dyn Write + Send> {
        std::mem::replace(&mut self.0, out)
    }
}

impl Default for Console {
    fn default() -> Self {
        Self(Box::new(io::stdout()))
    }
}

impl Write for Console {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

// ── TrafficSimulator ──────────────────────────────────────────────────────────

/// Everything the simulator receives for one invocation.
pub struct SimulationRequest<'a> {
    pub tick:    Tick,
    pub network: &'a NetworkState,
    pub trips:   &'a [TripRow],
}

/// A traffic-flow simulator: network state and OD demand in, per-trip
/// travel times out.
///
/// The call is blocking.  There is no timeout; wrap unreliable simulators in
/// an implementation that imposes one.
pub trait TrafficSimulator {
    fn simulate(
        &mut self,
        request: &SimulationRequest<'_>,
    ) -> Result<Vec<TravelTimeRecord>, SimulatorError>;

    /// Install `out` as the simulator's console and return the previous one.
    fn redirect_console(&mut self, out: Box<dyn Write + Send>) -> Box<dyn Write + Send>;
}

// ── ConsoleGuard ──────────────────────────────────────────────────────────────

/// Silences a simulator's console for the guard's lifetime.
pub struct ConsoleGuard<'a, S: TrafficSimulator + ?Sized> {
    simulator: &'a mut S,
    saved:     Option<Box<dyn Write + Send>>,
}

impl<'a, S: TrafficSimulator + ?Sized> ConsoleGuard<'a, S> {
    pub fn new(simulator: &'a mut S) -> Self {
        let saved = simulator.redirect_console(Box::new(io::sink()));
        Self { simulator, saved: Some(saved) }
    }
}

impl<S: TrafficSimulator + ?Sized> Deref for ConsoleGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.simulator
    }
}

impl<S: TrafficSimulator + ?Sized> DerefMut for ConsoleGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.simulator
    }
}

impl<S: TrafficSimulator + ?Sized> Drop for ConsoleGuard<'_, S> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.simulator.redirect_console(saved);
        }
    }
}
