//! Run configuration.
//!
//! Typically loaded from JSON by the application crate (with the `serde`
//! feature) and passed to the simulation builder.

use crate::{SimClock, Tick};

/// Thresholds for the accessibility check between two network nodes.
///
/// A trip is inaccessible only when it is both long (`travel_time_secs`
/// exceeded) and newly degraded (`change_ratio` exceeded).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AccessCutoffs {
    /// Absolute travel-time cutoff in seconds.  Default: 7 200 (2 hours).
    pub travel_time_secs: f64,
    /// Cutoff on current ÷ baseline travel time.  Default: 2.0.
    pub change_ratio: f64,
}

impl Default for AccessCutoffs {
    fn default() -> Self {
        Self {
            travel_time_secs: 7_200.0,
            change_ratio:     2.0,
        }
    }
}

/// Top-level simulation configuration.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Unix timestamp for tick 0 (the moment just before the event).
    pub start_unix_secs: i64,

    /// Seconds per tick.  Default: 86 400 (one recovery day).
    pub tick_duration_secs: u32,

    /// Total ticks to simulate, including the tick-0 baseline.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Write output every N ticks.  1 = every tick.
    pub output_interval_ticks: u64,

    /// Thresholds for labor and supplier accessibility checks.
    pub cutoffs: AccessCutoffs,

    /// A trip counts as completed (traffic consumption) when its change
    /// factor is at most this ratio.
    pub trip_cutoff_ratio: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start_unix_secs:       0,
            tick_duration_secs:    86_400,
            total_ticks:           1,
            seed:                  0,
            output_interval_ticks: 1,
            cutoffs:               AccessCutoffs::default(),
            trip_cutoff_ratio:     2.0,
        }
    }
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.start_unix_secs, self.tick_duration_secs)
    }
}
