//! Access to local suppliers.
//!
//! A business keeps its commodity inputs while at least one of its
//! suppliers is reachable.  When none is, it gets a "LocalSuppliers" factor
//! of 0.  Businesses without suppliers are never constrained.

use std::collections::BTreeMap;

use br_business::{Business, Factor, World};
use br_core::{BusinessId, DiagnosticKind, Diagnostics, DistributionSchedule, Scope};
use br_traffic::TripWiring;

use crate::access::reachable;
use crate::labor::in_scope;
use crate::{BusinessModel, DistributionContext, DistributionResult};

pub struct CommodityModel {
    resource_name: String,
    schedule:      DistributionSchedule,
    /// Outcome of the latest distribution, for businesses with suppliers.
    has_access:    BTreeMap<BusinessId, bool>,
    diagnostics:   Diagnostics,
}

impl CommodityModel {
    pub fn new(resource_name: impl Into<String>, schedule: DistributionSchedule) -> Self {
        let resource_name = resource_name.into();
        Self {
            diagnostics: Diagnostics::new(resource_name.clone()),
            resource_name,
            schedule,
            has_access: BTreeMap::new(),
        }
    }

    /// Whether `business` reached a supplier at the latest distribution.
    pub fn has_access(&self, business: BusinessId) -> Option<bool> {
        self.has_access.get(&business).copied()
    }

    fn any_supplier_reachable(
        &mut self,
        ctx:      &DistributionContext<'_>,
        world:    &World,
        business: &Business,
    ) -> bool {
        let Some(exposure) = world.home_exposure(business) else { return false };
        let Some(node) = ctx.traffic.node_of(exposure) else {
            self.diagnostics.record(Some(ctx.tick), DiagnosticKind::UnmappedBuilding { exposure });
            return false;
        };
        let mut any = false;
        for &supplier in &business.params.suppliers {
            let Some(supplier_node) = ctx.traffic.node_of(supplier) else {
                self.diagnostics.record(
                    Some(ctx.tick),
                    DiagnosticKind::UnknownSupplier { business: business.id, exposure: supplier },
                );
                continue;
            };
            // Every supplier is checked so each missing trip is reported.
            any |= reachable(ctx, node, supplier_node, &mut self.diagnostics);
        }
        any
    }
}

impl BusinessModel for CommodityModel {
    fn resource_name(&self) -> &str {
        &self.resource_name
    }

    fn schedule(&self) -> &DistributionSchedule {
        &self.schedule
    }

    /// One trip between every business and each of its suppliers.
    fn wire(&mut self, world: &World, trips: &mut dyn TripWiring) -> DistributionResult<()> {
        for business in &world.businesses {
            let Some(home) = world.home_exposure(business) else { continue };
            for &supplier in &business.params.suppliers {
                trips.ensure_trip_between(home, supplier)?;
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
        let access: Vec<(BusinessId, bool)> = {
            let world: &World = world;
            world
                .businesses
                .iter()
                .filter(|b| !b.params.suppliers.is_empty())
                .map(|b| (b.id, self.any_supplier_reachable(ctx, world, b)))
                .collect()
        };

        for (id, ok) in access {
            self.has_access.insert(id, ok);
            if !ok {
                world.businesses[id.index()].apply_factor(ctx.tick, 0.0, Factor::LocalSuppliers)?;
            }
        }
        tracing::debug!(resource = %self.resource_name, tick = %ctx.tick, "commodity access distributed");
        Ok(())
    }

    /// Businesses that depend on at least one supplier.
    fn total_demand(&self, scope: &Scope, world: &World) -> f64 {
        in_scope(scope, world).filter(|b| !b.params.suppliers.is_empty()).count() as f64
    }

    /// Businesses that reached a supplier at the latest distribution.
    fn total_supply(&self, scope: &Scope, world: &World) -> f64 {
        in_scope(scope, world)
            .filter(|b| self.has_access(b.id) == Some(true))
            .count() as f64
    }

    fn total_consumption(&self, scope: &Scope, world: &World) -> f64 {
        self.total_demand(scope, world).min(self.total_supply(scope, world))
    }

    fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}
