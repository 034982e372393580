//! Fluent builder for constructing a [`Sim`].

use std::collections::HashSet;

use br_business::World;
use br_core::{DistributionSchedule, SimConfig};
use br_distribution::{BusinessModel, CommodityModel, CustomerModel, LaborModel};
use br_traffic::{TrafficDistributionModel, TrafficSimulator};

use crate::{ComponentRecovery, ResilienceAggregator, Sim, SimError, SimResult};

/// Fluent builder for [`Sim<S, R>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: total ticks, cutoffs, output interval, …
/// - [`World`]: from [`br_business::WorldBuilder`]
/// - [`TrafficDistributionModel<S>`]: owns the simulator and OD table
/// - `R: ComponentRecovery`: e.g. [`NoRecovery`][crate::NoRecovery]
///
/// # Optional inputs
///
/// | Method                 | Adds                                  |
/// |------------------------|---------------------------------------|
/// | `.labor(schedule)`     | `LaborModel` named "Labor"            |
/// | `.customers(schedule)` | `CustomerModel` named "Customers"     |
/// | `.commodities(sched)`  | `CommodityModel` named "Commodities"  |
/// | `.model(boxed)`        | any other `BusinessModel`             |
///
/// Models distribute in the order they were added.
pub struct SimBuilder<S: TrafficSimulator, R: ComponentRecovery> {
    config:   SimConfig,
    world:    World,
    traffic:  TrafficDistributionModel<S>,
    recovery: R,
    models:   Vec<Box<dyn BusinessModel>>,
}

impl<S: TrafficSimulator, R: ComponentRecovery> SimBuilder<S, R> {
    /// Create a builder with all required inputs.
    pub fn new(
        config:   SimConfig,
        world:    World,
        traffic:  TrafficDistributionModel<S>,
        recovery: R,
    ) -> Self {
        Self { config, world, traffic, recovery, models: Vec::new() }
    }

    pub fn labor(self, schedule: DistributionSchedule) -> Self {
        self.model(Box::new(LaborModel::new("Labor", schedule)))
    }

    pub fn customers(self, schedule: DistributionSchedule) -> Self {
        self.model(Box::new(CustomerModel::new("Customers", schedule)))
    }

    pub fn commodities(self, schedule: DistributionSchedule) -> Self {
        self.model(Box::new(CommodityModel::new("Commodities", schedule)))
    }

    pub fn model(mut self, model: Box<dyn BusinessModel>) -> Self {
        self.models.push(model);
        self
    }

    /// Validate inputs, wire every model's trips into the OD table, and
    /// return a ready-to-run [`Sim`].
    ///
    /// Wiring happens here, before tick 0, so the baseline travel times
    /// already cover every injected trip.
    pub fn build(mut self) -> SimResult<Sim<S, R>> {
        if self.config.total_ticks == 0 {
            return Err(SimError::Config("total_ticks must be at least 1".into()));
        }
        let mut names = HashSet::new();
        names.insert(self.traffic.resource_name().to_owned());
        for m in &self.models {
            if !names.insert(m.resource_name().to_owned()) {
                return Err(SimError::Config(format!(
                    "duplicate resource name {:?}",
                    m.resource_name()
                )));
            }
        }

        let trips_before = self.traffic.registry().len();
        for m in &mut self.models {
            m.wire(&self.world, &mut self.traffic)?;
        }
        tracing::info!(
            businesses = self.world.businesses.len(),
            models = self.models.len(),
            injected_trips = self.traffic.registry().len() - trips_before,
            "simulation built"
        );

        Ok(Sim {
            clock:      self.config.make_clock(),
            config:     self.config,
            world:      self.world,
            traffic:    self.traffic,
            models:     self.models,
            recovery:   self.recovery,
            resilience: ResilienceAggregator::new(),
        })
    }
}
