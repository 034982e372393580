//! Customer base from zone population.
//!
//! A zone's population is the shelter capacity of its buildings: initial
//! capacity before the event, current capacity now.  Each business draws a
//! fixed share of its customers from each zone; the "Others" share has no
//! geographic home and always counts in full.  Businesses without any
//! customer data are left unconstrained.

use std::collections::BTreeMap;

use br_business::{CustomerOrigin, Factor, World};
use br_core::{BusinessId, DiagnosticKind, Diagnostics, DistributionSchedule, Scope, ZoneId};

use crate::labor::in_scope;
use crate::{BusinessModel, DistributionContext, DistributionResult};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct ZonePopulation {
    initial: f64,
    current: f64,
}

impl ZonePopulation {
    /// Current over initial; 1.0 for zones that never had anyone.
    fn availability(&self) -> f64 {
        if self.initial == 0.0 { 1.0 } else { self.current / self.initial }
    }
}

pub struct CustomerModel {
    resource_name: String,
    schedule:      DistributionSchedule,
    diagnostics:   Diagnostics,
}

impl CustomerModel {
    pub fn new(resource_name: impl Into<String>, schedule: DistributionSchedule) -> Self {
        let resource_name = resource_name.into();
        Self {
            diagnostics: Diagnostics::new(resource_name.clone()),
            resource_name,
            schedule,
        }
    }

    /// Availability ratio of every zone with at least one building.
    /// Buildings without a shelter capacity house nobody but still put
    /// their zone on the map.
    pub fn zone_availability(world: &World) -> BTreeMap<ZoneId, f64> {
        let mut zones: BTreeMap<ZoneId, ZonePopulation> = BTreeMap::new();
        for (component, building) in world.buildings() {
            let zone = zones.entry(building.zone.clone()).or_default();
            if let Some(shelter) = component.shelter() {
                zone.initial += shelter.initial;
                zone.current += shelter.current;
            }
        }
        zones.into_iter().map(|(id, p)| (id, p.availability())).collect()
    }
}

impl BusinessModel for CustomerModel {
    fn resource_name(&self) -> &str {
        &self.resource_name
    }

    fn schedule(&self) -> &DistributionSchedule {
        &self.schedule
    }

    fn distribute(
        &mut self,
        ctx:   &DistributionContext<'_>,
        world: &mut World,
    ) -> DistributionResult<()> {
        if !self.schedule.contains(ctx.tick) {
            return Ok(());
        }
        let zones = Self::zone_availability(world);

        let mut bases: Vec<(BusinessId, f64)> = Vec::with_capacity(world.businesses.len());
        for business in world.businesses.iter().filter(|b| !b.params.customers.is_empty()) {
            let mut base = 0.0;
            for (origin, share) in business.params.customers.iter() {
                base += match origin {
                    CustomerOrigin::Others => share,
                    CustomerOrigin::Zone(zone) => match zones.get(&zone) {
                        Some(ratio) => share * ratio,
                        None => {
                            self.diagnostics.record(
                                Some(ctx.tick),
                                DiagnosticKind::MissingZone {
                                    business: business.id,
                                    zone,
                                },
                            );
                            0.0
                        }
                    },
                };
            }
            bases.push((business.id, base));
        }

        for (id, base) in bases {
            let business = &mut world.businesses[id.index()];
            business.record_customer_base(ctx.tick, base);
            business.apply_factor(ctx.tick, base, Factor::CustomerBase)?;
        }
        tracing::debug!(resource = %self.resource_name, tick = %ctx.tick, "customers distributed");
        Ok(())
    }

    /// One unit of demand per business.
    fn total_demand(&self, scope: &Scope, world: &World) -> f64 {
        in_scope(scope, world).count() as f64
    }

    /// Sum of the latest customer base of every business.
    fn total_supply(&self, scope: &Scope, world: &World) -> f64 {
        in_scope(scope, world).filter_map(|b| b.latest_customer_base()).sum()
    }

    fn total_consumption(&self, scope: &Scope, world: &World) -> f64 {
        self.total_demand(scope, world).min(self.total_supply(scope, world))
    }

    fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}
