//! The `BusinessModel` trait: one per distributed resource.

use br_business::World;
use br_core::{Diagnostics, DistributionSchedule, Scope};
use br_traffic::TripWiring;

use crate::{DistributionContext, DistributionResult};

/// A resource whose distribution constrains business functionality.
///
/// # Required methods
///
/// Everything except [`wire`][Self::wire], which defaults to a no-op for
/// models that need no trips.
///
/// # Call order
///
/// `wire` once before the first tick, then `distribute` every tick after
/// the world has opened the timestep and traffic has distributed.
pub trait BusinessModel {
    fn resource_name(&self) -> &str;

    fn schedule(&self) -> &DistributionSchedule;

    /// Ensure the OD trips this model's accessibility checks rely on exist.
    fn wire(&mut self, _world: &World, _trips: &mut dyn TripWiring) -> DistributionResult<()> {
        Ok(())
    }

    /// Push this tick's factor into every business.  A no-op on ungated
    /// ticks.
    fn distribute(
        &mut self,
        ctx:   &DistributionContext<'_>,
        world: &mut World,
    ) -> DistributionResult<()>;

    fn total_demand(&self, scope: &Scope, world: &World) -> f64;

    fn total_supply(&self, scope: &Scope, world: &World) -> f64;

    fn total_consumption(&self, scope: &Scope, world: &World) -> f64;

    fn diagnostics(&self) -> &Diagnostics;
}
