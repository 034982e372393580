//! Simulation observer trait for progress reporting and data collection.

use br_business::World;
use br_core::Tick;

use crate::{ResourceTotals, SystemSnapshot};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: revenue printer
///
/// ```rust,ignore
/// struct RevenuePrinter;
///
/// impl SimObserver for RevenuePrinter {
///     fn on_tick_end(&mut self, tick: Tick, snapshot: &SystemSnapshot) {
///         println!("{tick}: {:.0} of {:.0}", snapshot.total_revenue, snapshot.baseline_revenue);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before recovery runs.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once every model has distributed and the resilience
    /// aggregator has recorded the tick.
    fn on_tick_end(&mut self, _tick: Tick, _snapshot: &SystemSnapshot) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks`
    /// ticks) with the full world and each resource's totals.
    fn on_snapshot(
        &mut self,
        _tick:     Tick,
        _world:    &World,
        _snapshot: &SystemSnapshot,
        _totals:   &[ResourceTotals],
    ) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
