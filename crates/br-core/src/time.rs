//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter; one tick is one
//! recovery timestep (one simulated day by default).  Tick 0 is the
//! pre-disaster baseline.  The mapping to wall-clock time is held in
//! `SimClock`:
//!
//!   wall_time = start_unix_secs + tick * tick_duration_secs
//!
//! Not every resource is redistributed every tick.  A
//! [`DistributionSchedule`] lists the ticks at which a distribution model
//! actually recomputes; between scheduled ticks, readers hold the last
//! computed value (see [`DistributionSchedule::nearest_prior`]).

use std::collections::BTreeSet;
use std::fmt;

use crate::{CoreError, CoreResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Cast to `usize` for indexing tick-aligned histories.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between tick counts and Unix wall-clock seconds.
#[derive(Clone, Debug)]
pub struct SimClock {
    /// Unix timestamp (seconds since epoch) of tick 0.
    pub start_unix_secs: i64,
    /// How many real seconds one tick represents.  Default: 86 400 (1 day).
    pub tick_duration_secs: u32,
    /// The current tick: advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(start_unix_secs: i64, tick_duration_secs: u32) -> Self {
        Self {
            start_unix_secs,
            tick_duration_secs,
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Unix timestamp corresponding to an arbitrary `tick`.
    #[inline]
    pub fn unix_secs_at(&self, tick: Tick) -> i64 {
        self.start_unix_secs + tick.0 as i64 * self.tick_duration_secs as i64
    }

    /// Current Unix timestamp corresponding to `current_tick`.
    #[inline]
    pub fn current_unix_secs(&self) -> i64 {
        self.unix_secs_at(self.current_tick)
    }

    /// Whole simulated days elapsed since tick 0.
    pub fn elapsed_days(&self) -> u64 {
        self.current_tick.0 * self.tick_duration_secs as u64 / 86_400
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (day {})", self.current_tick, self.elapsed_days())
    }
}

// ── DistributionSchedule ──────────────────────────────────────────────────────

/// The set of ticks at which a distribution model recomputes.
///
/// Models that share a resource must share the same schedule.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<Tick>", into = "Vec<Tick>"))]
pub struct DistributionSchedule {
    ticks: BTreeSet<Tick>,
}

impl DistributionSchedule {
    /// Build from a strictly increasing list of ticks.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnorderedSchedule`] at the first tick that is not
    /// greater than its predecessor.
    pub fn from_ticks(ticks: impl IntoIterator<Item = Tick>) -> CoreResult<Self> {
        let mut set = BTreeSet::new();
        let mut last: Option<Tick> = None;
        for tick in ticks {
            if last.is_some_and(|l| tick <= l) {
                return Err(CoreError::UnorderedSchedule(tick));
            }
            set.insert(tick);
            last = Some(tick);
        }
        Ok(Self { ticks: set })
    }

    /// Every `interval` ticks starting at 0, up to (excluding) `total_ticks`.
    pub fn every(interval: u64, total_ticks: u64) -> Self {
        let step = interval.max(1) as usize;
        Self {
            ticks: (0..total_ticks).step_by(step).map(Tick).collect(),
        }
    }

    /// Every tick in `0..total_ticks`.
    pub fn always(total_ticks: u64) -> Self {
        Self::every(1, total_ticks)
    }

    /// Is `tick` a distribution tick?
    #[inline]
    pub fn contains(&self, tick: Tick) -> bool {
        self.ticks.contains(&tick)
    }

    /// The latest scheduled tick `<= tick`, or `None` if nothing has been
    /// scheduled yet.
    pub fn nearest_prior(&self, tick: Tick) -> Option<Tick> {
        self.ticks.range(..=tick).next_back().copied()
    }

    pub fn first(&self) -> Option<Tick> {
        self.ticks.first().copied()
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Tick> + '_ {
        self.ticks.iter().copied()
    }
}

impl TryFrom<Vec<Tick>> for DistributionSchedule {
    type Error = CoreError;
    fn try_from(ticks: Vec<Tick>) -> CoreResult<Self> {
        Self::from_ticks(ticks)
    }
}

impl From<DistributionSchedule> for Vec<Tick> {
    fn from(s: DistributionSchedule) -> Vec<Tick> {
        s.ticks.into_iter().collect()
    }
}
