//! Employee availability.
//!
//! An employee is available when their listed home building is fully
//! functional and reachable from the business.  Employees without a listed
//! home, or whose home is unknown or unmapped, are unavailable:
//!
//! ```text
//! ratio = min(available homes, employee_count) / employee_count
//! ```
//!
//! A business with no employees has a ratio of 1.0.

use br_business::{Business, Factor, World};
use br_core::{BusinessId, DiagnosticKind, Diagnostics, DistributionSchedule, Scope};
use br_traffic::TripWiring;

use crate::access::reachable;
use crate::{BusinessModel, DistributionContext, DistributionResult};

pub struct LaborModel {
    resource_name: String,
    schedule:      DistributionSchedule,
    diagnostics:   Diagnostics,
}

impl LaborModel {
    pub fn new(resource_name: impl Into<String>, schedule: DistributionSchedule) -> Self {
        let resource_name = resource_name.into();
        Self {
            diagnostics: Diagnostics::new(resource_name.clone()),
            resource_name,
            schedule,
        }
    }

    fn availability(
        &mut self,
        ctx:      &DistributionContext<'_>,
        world:    &World,
        business: &Business,
    ) -> f64 {
        let employees = business.params.employee_count;
        if employees == 0 {
            return 1.0;
        }
        let work_node = world.home_exposure(business).and_then(|e| {
            let node = ctx.traffic.node_of(e);
            if node.is_none() {
                self.diagnostics.record(
                    Some(ctx.tick),
                    DiagnosticKind::UnmappedBuilding { exposure: e },
                );
            }
            node
        });

        let mut available = 0u32;
        for &exposure in &business.params.employee_homes {
            let Some(home) = world.building_by_exposure(exposure) else {
                self.diagnostics.record(
                    Some(ctx.tick),
                    DiagnosticKind::UnknownEmployeeHome { business: business.id, exposure },
                );
                continue;
            };
            let is_available = home.is_fully_functional()
                && match (ctx.traffic.node_of(exposure), work_node) {
                    (Some(from), Some(to)) => reachable(ctx, from, to, &mut self.diagnostics),
                    (None, _) => {
                        self.diagnostics.record(
                            Some(ctx.tick),
                            DiagnosticKind::UnmappedBuilding { exposure },
                        );
                        false
                    }
                    (Some(_), None) => false,
                };
            if is_available {
                available += 1;
            }
        }
        available.min(employees) as f64 / employees as f64
    }
}

impl BusinessModel for LaborModel {
    fn resource_name(&self) -> &str {
        &self.resource_name
    }

    fn schedule(&self) -> &DistributionSchedule {
        &self.schedule
    }

    /// One trip from every employee home to the workplace.
    fn wire(&mut self, world: &World, trips: &mut dyn TripWiring) -> DistributionResult<()> {
        for business in &world.businesses {
            let Some(work) = world.home_exposure(business) else { continue };
            for &home in &business.params.employee_homes {
                if world.building_by_exposure(home).is_none() {
                    self.diagnostics.record(
                        None,
                        DiagnosticKind::UnknownEmployeeHome { business: business.id, exposure: home },
                    );
                    continue;
                }
                trips.ensure_trip_between(home, work)?;
            }
        }
        Ok(())
    }

    fn distribute(
        &mut self,
        ctx:   &DistributionContext<'_>,
        world: &mut World,
    ) -> DistributionResult<()> {
        if !self.schedule.contains(ctx.tick) {
            return Ok(());
        }
        // Collect first (immutable scan) then mutate.
        let ratios: Vec<(BusinessId, f64)> = {
            let world: &World = world;
            world.businesses.iter().map(|b| (b.id, self.availability(ctx, world, b))).collect()
        };

        for (id, ratio) in ratios {
            let business = &mut world.businesses[id.index()];
            business.record_employee_availability(ctx.tick, ratio);
            business.apply_factor(ctx.tick, ratio, Factor::Labor)?;
        }
        tracing::debug!(resource = %self.resource_name, tick = %ctx.tick, "labor distributed");
        Ok(())
    }

    fn total_demand(&self, scope: &Scope, world: &World) -> f64 {
        in_scope(scope, world).map(|b| b.employee_demand() as f64).sum()
    }

    fn total_supply(&self, scope: &Scope, world: &World) -> f64 {
        in_scope(scope, world).map(|b| b.employee_supply() as f64).sum()
    }

    fn total_consumption(&self, scope: &Scope, world: &World) -> f64 {
        in_scope(scope, world).map(|b| b.employee_consumption() as f64).sum()
    }

    fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

/// Businesses hosted by components in `scope`.
pub(crate) fn in_scope<'w>(scope: &'w Scope, world: &'w World) -> impl Iterator<Item = &'w Business> {
    world.businesses.iter().filter(move |b| scope.includes(b.home))
}
