//! Plain data row types written by output backends.

use br_business::{Business, World};
use br_core::Tick;
use br_sim::{ResourceTotals, SystemSnapshot};

/// One business's state at a snapshot tick.
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessSnapshotRow {
    pub tick:                  u64,
    pub business_id:           u32,
    pub company_name:          String,
    pub functionality:         f64,
    pub revenue:               f64,
    /// Label of the tightest constraint; empty when nothing was binding.
    pub binding_factor:        String,
    pub employee_availability: Option<f64>,
    pub customer_base:         Option<f64>,
}

impl BusinessSnapshotRow {
    pub fn from_business(tick: Tick, b: &Business) -> Self {
        Self {
            tick:                  tick.0,
            business_id:           b.id.0,
            company_name:          b.params.company_name.clone(),
            functionality:         b.functionality_at(tick).unwrap_or(b.current_functionality()),
            revenue:               b.revenue_at(tick).unwrap_or(0.0),
            binding_factor:        b.binding_factor(tick).map(|f| f.label().to_owned()).unwrap_or_default(),
            employee_availability: b.employee_availability(tick),
            customer_base:         b.customer_base(tick),
        }
    }

    /// Rows for every business in `world`, in id order.
    pub fn collect(tick: Tick, world: &World) -> Vec<Self> {
        world.businesses.iter().map(|b| Self::from_business(tick, b)).collect()
    }
}

/// System roll-up for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemSummaryRow {
    pub tick:                     u64,
    pub unix_time_secs:           i64,
    pub total_revenue:            f64,
    pub baseline_revenue:         f64,
    pub mean_functionality:       f64,
    pub nonfunctional_businesses: u64,
}

impl SystemSummaryRow {
    pub fn new(snapshot: &SystemSnapshot, unix_time_secs: i64) -> Self {
        Self {
            tick:                     snapshot.tick.0,
            unix_time_secs,
            total_revenue:            snapshot.total_revenue,
            baseline_revenue:         snapshot.baseline_revenue,
            mean_functionality:       snapshot.mean_functionality,
            nonfunctional_businesses: snapshot.nonfunctional_businesses as u64,
        }
    }
}

/// Demand, supply, and consumption of one resource at a snapshot tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceTotalsRow {
    pub tick:        u64,
    pub resource:    String,
    pub demand:      f64,
    pub supply:      f64,
    pub consumption: f64,
}

impl ResourceTotalsRow {
    pub fn new(tick: Tick, totals: &ResourceTotals) -> Self {
        Self {
            tick:        tick.0,
            resource:    totals.resource.clone(),
            demand:      totals.demand,
            supply:      totals.supply,
            consumption: totals.consumption,
        }
    }
}
