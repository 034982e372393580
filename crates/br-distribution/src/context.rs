//! Read-only per-tick state passed to every business model.

use br_core::{AccessCutoffs, Tick};
use br_traffic::TravelTimeSource;

/// Built once per tick by the simulation loop, after the traffic model has
/// distributed.
pub struct DistributionContext<'a> {
    pub tick:    Tick,
    /// Travel times and the building-to-node map.
    pub traffic: &'a dyn TravelTimeSource,
    pub cutoffs: AccessCutoffs,
}

impl<'a> DistributionContext<'a> {
    #[inline]
    pub fn new(tick: Tick, traffic: &'a dyn TravelTimeSource, cutoffs: AccessCutoffs) -> Self {
        Self { tick, traffic, cutoffs }
    }
}
