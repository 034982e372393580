//! System-level roll-up of business functionality and revenue.
//!
//! The aggregator is a read-only consumer: it copies what it needs out of
//! the [`World`] at the end of each tick and never feeds back into the
//! models.

use std::collections::BTreeMap;

use br_business::{Factor, World};
use br_core::{BusinessId, Tick};

/// System state at the end of one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct SystemSnapshot {
    pub tick:                     Tick,
    /// Σ business revenue this tick.
    pub total_revenue:            f64,
    /// Σ baseline daily revenue (annual sales ÷ 365).
    pub baseline_revenue:         f64,
    /// 1.0 when there are no businesses.
    pub mean_functionality:       f64,
    /// Businesses at zero functionality.
    pub nonfunctional_businesses: usize,
    /// How many businesses each factor was the tightest constraint for.
    pub binding_factors:          BTreeMap<Factor, usize>,
}

impl SystemSnapshot {
    /// Revenue as a share of baseline; 1.0 with no baseline revenue.
    pub fn revenue_ratio(&self) -> f64 {
        if self.baseline_revenue > 0.0 { self.total_revenue / self.baseline_revenue } else { 1.0 }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ResilienceAggregator {
    snapshots:     Vec<SystemSnapshot>,
    functionality: BTreeMap<BusinessId, Vec<(Tick, f64)>>,
    revenue:       BTreeMap<BusinessId, Vec<(Tick, f64)>>,
}

impl ResilienceAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the state of every business at `tick`.
    pub fn update(&mut self, tick: Tick, world: &World) -> &SystemSnapshot {
        let mut total_revenue = 0.0;
        let mut baseline_revenue = 0.0;
        let mut functionality_sum = 0.0;
        let mut nonfunctional_businesses = 0;
        let mut binding_factors = BTreeMap::new();

        for b in &world.businesses {
            let f = b.functionality_at(tick).unwrap_or(b.current_functionality());
            let r = b.revenue_at(tick).unwrap_or(0.0);
            total_revenue += r;
            baseline_revenue += b.baseline_daily_revenue();
            functionality_sum += f;
            if f <= 0.0 {
                nonfunctional_businesses += 1;
            }
            if let Some(factor) = b.binding_factor(tick) {
                *binding_factors.entry(factor).or_insert(0) += 1;
            }
            self.functionality.entry(b.id).or_default().push((tick, f));
            self.revenue.entry(b.id).or_default().push((tick, r));
        }

        let n = world.businesses.len();
        self.snapshots.push(SystemSnapshot {
            tick,
            total_revenue,
            baseline_revenue,
            mean_functionality: if n == 0 { 1.0 } else { functionality_sum / n as f64 },
            nonfunctional_businesses,
            binding_factors,
        });
        &self.snapshots[self.snapshots.len() - 1]
    }

    pub fn snapshots(&self) -> &[SystemSnapshot] {
        &self.snapshots
    }

    pub fn latest(&self) -> Option<&SystemSnapshot> {
        self.snapshots.last()
    }

    /// Σ over recorded ticks of (baseline − revenue).
    pub fn lost_revenue(&self) -> f64 {
        self.snapshots.iter().map(|s| s.baseline_revenue - s.total_revenue).sum()
    }

    /// The tick with the lowest total revenue (earliest on ties).
    pub fn min_snapshot(&self) -> Option<&SystemSnapshot> {
        self.snapshots.iter().fold(None, |best, s| match best {
            Some(b) if b.total_revenue <= s.total_revenue => Some(b),
            _ => Some(s),
        })
    }

    /// First tick from which total revenue stays at or above
    /// `threshold × baseline` through the last recorded tick.
    pub fn recovery_tick(&self, threshold: f64) -> Option<Tick> {
        let recovered = |s: &SystemSnapshot| s.total_revenue >= threshold * s.baseline_revenue;
        let tail = self.snapshots.iter().rev().take_while(|s| recovered(*s)).count();
        if tail == 0 {
            return None;
        }
        Some(self.snapshots[self.snapshots.len() - tail].tick)
    }

    pub fn business_functionality(&self, id: BusinessId) -> &[(Tick, f64)] {
        self.functionality.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn business_revenue(&self, id: BusinessId) -> &[(Tick, f64)] {
        self.revenue.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}
