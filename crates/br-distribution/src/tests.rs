//! Unit tests for br-distribution.
//!
//! Travel times come from a stub that returns fixed verdicts per node pair.

#[cfg(test)]
mod helpers {
    use std::collections::HashMap;

    use br_business::{BusinessParams, World};
    use br_core::{AccessCutoffs, ExposureId, NodeId, Tick, TripId};
    use br_traffic::{Accessibility, TrafficResult, TravelTimeSource, TripWiring};

    use crate::DistributionContext;

    /// Node `n` for exposure `n`, unless overridden.
    #[derive(Default)]
    pub struct StubTraffic {
        pub unmapped: Vec<ExposureId>,
        pub verdicts: HashMap<(NodeId, NodeId), Accessibility>,
    }

    impl StubTraffic {
        pub fn set(&mut self, a: u32, b: u32, verdict: Accessibility) {
            self.verdicts.insert((NodeId(a), NodeId(b)), verdict);
        }
    }

    impl TravelTimeSource for StubTraffic {
        fn accessibility(
            &self,
            _tick:    Tick,
            from:     NodeId,
            to:       NodeId,
            _cutoffs: &AccessCutoffs,
        ) -> Accessibility {
            self.verdicts
                .get(&(from, to))
                .or_else(|| self.verdicts.get(&(to, from)))
                .copied()
                .unwrap_or(Accessibility::NoTrip)
        }

        fn node_of(&self, exposure: ExposureId) -> Option<NodeId> {
            (!self.unmapped.contains(&exposure)).then_some(NodeId(exposure.0))
        }
    }

    #[derive(Default)]
    pub struct RecordingWiring(pub Vec<(ExposureId, ExposureId)>);

    impl TripWiring for RecordingWiring {
        fn ensure_trip_between(
            &mut self,
            from: ExposureId,
            to:   ExposureId,
        ) -> TrafficResult<Option<TripId>> {
            self.0.push((from, to));
            Ok(Some(TripId(self.0.len() as u64)))
        }
    }

    pub fn ctx(tick: u64, traffic: &StubTraffic) -> DistributionContext<'_> {
        DistributionContext::new(Tick(tick), traffic, AccessCutoffs::default())
    }

    /// 365 000 annual sales → 1 000 per day.
    pub fn params() -> BusinessParams {
        BusinessParams {
            company_name: "Pier Provisions".into(),
            annual_sales: 365_000.0,
            ..Default::default()
        }
    }

    pub fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    pub fn open(world: &mut World, tick: u64) {
        world.begin_timestep(Tick(tick)).unwrap();
    }
}

// ── Labor ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod labor {
    use br_business::{Factor, World, WorldBuilder};
    use br_core::{
        BusinessId, ComponentId, DiagnosticKind, DistributionSchedule, ExposureId, Scope, Tick,
    };
    use br_traffic::Accessibility;

    use super::helpers::{RecordingWiring, StubTraffic, assert_close, ctx, open, params};
    use crate::{BusinessModel, LaborModel};

    /// Shop at exposure 100; ten employees living in buildings 1..=10.
    fn world() -> (World, BusinessId, Vec<ComponentId>) {
        let mut w = WorldBuilder::new();
        let homes: Vec<_> = (1..=10)
            .map(|e| w.add_building(format!("home{e}"), ExposureId(e), "Z1", 3.0, Some(3.0)))
            .collect();
        let shop = w.add_building("shop", ExposureId(100), "Z1", 0.0, None);
        let mut p = params();
        p.employee_count = 10;
        p.employee_homes = (1..=10).map(ExposureId).collect();
        let b = w.add_business(shop, p);
        (w.build().unwrap(), b, homes)
    }

    fn all_accessible() -> StubTraffic {
        let mut traffic = StubTraffic::default();
        for e in 1..=10 {
            traffic.set(e, 100, Accessibility::Accessible);
        }
        traffic
    }

    #[test]
    fn six_of_ten_employees_gives_point_six() {
        let (mut world, b, homes) = world();
        let mut labor = LaborModel::new("labor", DistributionSchedule::from_ticks([Tick(0), Tick(5)]).unwrap());

        let traffic = all_accessible();
        open(&mut world, 0);
        labor.distribute(&ctx(0, &traffic), &mut world).unwrap();
        assert_eq!(world.business(b).unwrap().functionality_at(Tick(0)), Some(1.0));

        // Two homes damaged, two homes cut off.
        world.component_mut(homes[6]).unwrap().functionality = 0.5;
        world.component_mut(homes[7]).unwrap().functionality = 0.99;
        let mut traffic = all_accessible();
        traffic.set(9, 100, Accessibility::Inaccessible);
        traffic.set(100, 10, Accessibility::Inaccessible);

        open(&mut world, 5);
        labor.distribute(&ctx(5, &traffic), &mut world).unwrap();

        let business = world.business(b).unwrap();
        assert_eq!(business.employee_availability(Tick(5)), Some(0.6));
        assert_eq!(business.functionality_at(Tick(5)), Some(0.6));
        assert_eq!(business.binding_factor(Tick(5)), Some(Factor::Labor));
        assert_close(
            business.revenue_at(Tick(5)).unwrap(),
            business.revenue_at(Tick(0)).unwrap() * 0.6,
        );
    }

    #[test]
    fn ungated_tick_leaves_business_alone() {
        let (mut world, b, _) = world();
        let mut labor = LaborModel::new("labor", DistributionSchedule::from_ticks([Tick(0)]).unwrap());
        let traffic = StubTraffic::default();
        open(&mut world, 1);
        labor.distribute(&ctx(1, &traffic), &mut world).unwrap();
        assert_eq!(world.business(b).unwrap().employee_availability(Tick(1)), None);
        assert_eq!(world.business(b).unwrap().functionality_at(Tick(1)), Some(1.0));
    }

    #[test]
    fn missing_trips_count_as_unavailable_and_are_reported() {
        let (mut world, b, _) = world();
        let mut labor = LaborModel::new("labor", DistributionSchedule::always(1));
        let mut traffic = all_accessible();
        traffic.verdicts.remove(&(br_core::NodeId(4), br_core::NodeId(100)));

        open(&mut world, 0);
        labor.distribute(&ctx(0, &traffic), &mut world).unwrap();
        assert_eq!(world.business(b).unwrap().employee_availability(Tick(0)), Some(0.9));
        assert!(matches!(
            labor.diagnostics().records()[0].kind,
            DiagnosticKind::MissingTrip { .. }
        ));
    }

    #[test]
    fn totals_follow_latest_availability() {
        let (mut world, _, homes) = world();
        let mut labor = LaborModel::new("labor", DistributionSchedule::always(1));
        assert_eq!(labor.total_supply(&Scope::All, &world), 0.0);

        for h in &homes[..5] {
            world.component_mut(*h).unwrap().functionality = 0.0;
        }
        let traffic = all_accessible();
        open(&mut world, 0);
        labor.distribute(&ctx(0, &traffic), &mut world).unwrap();

        assert_eq!(labor.total_demand(&Scope::All, &world), 10.0);
        assert_eq!(labor.total_supply(&Scope::All, &world), 5.0);
        assert_eq!(labor.total_consumption(&Scope::All, &world), 5.0);
        assert_eq!(labor.total_demand(&Scope::Components(vec![homes[0]]), &world), 0.0);
    }

    #[test]
    fn wiring_adds_one_trip_per_employee_home() {
        let (world, _, _) = world();
        let mut labor = LaborModel::new("labor", DistributionSchedule::always(1));
        let mut wiring = RecordingWiring::default();
        labor.wire(&world, &mut wiring).unwrap();
        assert_eq!(wiring.0.len(), 10);
        assert_eq!(wiring.0[0], (ExposureId(1), ExposureId(100)));
    }

    #[test]
    fn employees_without_listed_homes_are_unavailable() {
        let mut w = WorldBuilder::new();
        for e in 1..=6 {
            w.add_building(format!("home{e}"), ExposureId(e), "Z1", 3.0, Some(3.0));
        }
        let shop = w.add_building("shop", ExposureId(100), "Z1", 0.0, None);
        let mut p = params();
        p.employee_count = 10;
        p.employee_homes = (1..=6).map(ExposureId).collect();
        let b = w.add_business(shop, p);
        let mut world = w.build().unwrap();

        let mut labor = LaborModel::new("labor", DistributionSchedule::always(1));
        open(&mut world, 0);
        labor.distribute(&ctx(0, &all_accessible()), &mut world).unwrap();

        let business = world.business(b).unwrap();
        assert_eq!(business.employee_availability(Tick(0)), Some(0.6));
        assert_eq!(business.functionality_at(Tick(0)), Some(0.6));
        assert!(labor.diagnostics().is_empty());
    }

    #[test]
    fn unknown_home_counts_as_unavailable() {
        let mut w = WorldBuilder::new();
        let shop = w.add_building("shop", ExposureId(100), "Z1", 0.0, None);
        let mut p = params();
        p.employee_count = 2;
        p.employee_homes = vec![ExposureId(555)];
        let b = w.add_business(shop, p);
        let mut world = w.build().unwrap();

        let mut labor = LaborModel::new("labor", DistributionSchedule::always(1));
        let mut wiring = RecordingWiring::default();
        labor.wire(&world, &mut wiring).unwrap();
        assert!(wiring.0.is_empty());

        open(&mut world, 0);
        labor.distribute(&ctx(0, &StubTraffic::default()), &mut world).unwrap();
        assert_eq!(world.business(b).unwrap().employee_availability(Tick(0)), Some(0.0));
        assert_eq!(labor.diagnostics().len(), 2);
    }
}

// ── Customers ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod customers {
    use br_business::{CustomerShares, Factor, World, WorldBuilder};
    use br_core::{BusinessId, ComponentId, DiagnosticKind, DistributionSchedule, ExposureId, Scope, Tick};

    use super::helpers::{StubTraffic, assert_close, ctx, open, params};
    use crate::{BusinessModel, CustomerModel};

    /// Z1: one shelter of 100, Z2: one shelter of 80, Z3: no shelter.
    fn world(shares: CustomerShares) -> (World, BusinessId, ComponentId) {
        let mut w = WorldBuilder::new();
        let z1 = w.add_building("z1 home", ExposureId(1), "Z1", 100.0, Some(100.0));
        w.add_building("z2 home", ExposureId(2), "Z2", 80.0, Some(80.0));
        w.add_building("z3 office", ExposureId(3), "Z3", 0.0, None);
        let shop = w.add_building("shop", ExposureId(10), "Z2", 0.0, None);
        let mut p = params();
        p.customers = shares;
        let b = w.add_business(shop, p);
        (w.build().unwrap(), b, z1)
    }

    #[test]
    fn customer_base_is_share_weighted_availability() {
        let shares = CustomerShares::new().with_zone("Z1", 0.4).with_zone("Z2", 0.6);
        let (mut world, b, z1) = world(shares);
        world.component_mut(z1).unwrap().shelter_mut().unwrap().current = 50.0;

        let mut customers = CustomerModel::new("customers", DistributionSchedule::always(1));
        let traffic = StubTraffic::default();
        open(&mut world, 0);
        customers.distribute(&ctx(0, &traffic), &mut world).unwrap();

        let business = world.business(b).unwrap();
        assert_close(business.customer_base(Tick(0)).unwrap(), 0.8);
        assert_close(business.functionality_at(Tick(0)).unwrap(), 0.8);
        assert_eq!(business.binding_factor(Tick(0)), Some(Factor::CustomerBase));
    }

    #[test]
    fn others_share_counts_in_full() {
        let shares = CustomerShares::new().with_zone("Z1", 0.5).with_others(0.5);
        let (mut world, b, z1) = world(shares);
        world.component_mut(z1).unwrap().shelter_mut().unwrap().current = 0.0;

        let mut customers = CustomerModel::new("customers", DistributionSchedule::always(1));
        open(&mut world, 0);
        customers.distribute(&ctx(0, &StubTraffic::default()), &mut world).unwrap();
        assert_close(world.business(b).unwrap().customer_base(Tick(0)).unwrap(), 0.5);
    }

    #[test]
    fn zone_without_population_record_is_zero_and_reported() {
        let shares = CustomerShares::new().with_zone("Z2", 0.7).with_zone("Z9", 0.3);
        let (mut world, b, _) = world(shares);
        let mut customers = CustomerModel::new("customers", DistributionSchedule::always(1));
        open(&mut world, 0);
        customers.distribute(&ctx(0, &StubTraffic::default()), &mut world).unwrap();

        assert_close(world.business(b).unwrap().customer_base(Tick(0)).unwrap(), 0.7);
        assert!(matches!(
            &customers.diagnostics().records()[0].kind,
            DiagnosticKind::MissingZone { zone, .. } if zone.as_str() == "Z9"
        ));
    }

    #[test]
    fn zone_of_only_non_residential_buildings_is_fully_available() {
        let shares = CustomerShares::new().with_zone("Z3", 1.0);
        let (mut world, b, _) = world(shares);
        let mut customers = CustomerModel::new("customers", DistributionSchedule::always(1));
        open(&mut world, 0);
        customers.distribute(&ctx(0, &StubTraffic::default()), &mut world).unwrap();

        let business = world.business(b).unwrap();
        assert_eq!(business.customer_base(Tick(0)), Some(1.0));
        assert_eq!(business.functionality_at(Tick(0)), Some(1.0));
        assert!(customers.diagnostics().is_empty());
    }

    #[test]
    fn zone_with_no_initial_population_is_fully_available() {
        let mut w = WorldBuilder::new();
        w.add_building("empty", ExposureId(1), "Z1", 0.0, Some(0.0));
        let zones = CustomerModel::zone_availability(&w.build().unwrap());
        assert_eq!(zones.values().copied().collect::<Vec<_>>(), vec![1.0]);
    }

    #[test]
    fn business_without_customer_data_is_unconstrained() {
        let (mut world, b, z1) = world(CustomerShares::default());
        world.component_mut(z1).unwrap().shelter_mut().unwrap().current = 0.0;
        let mut customers = CustomerModel::new("customers", DistributionSchedule::always(1));
        open(&mut world, 0);
        customers.distribute(&ctx(0, &StubTraffic::default()), &mut world).unwrap();
        assert_eq!(world.business(b).unwrap().customer_base(Tick(0)), None);
        assert_eq!(world.business(b).unwrap().functionality_at(Tick(0)), Some(1.0));
    }

    #[test]
    fn totals() {
        let shares = CustomerShares::new().with_zone("Z1", 1.0);
        let (mut world, _, z1) = world(shares);
        world.component_mut(z1).unwrap().shelter_mut().unwrap().current = 25.0;
        let mut customers = CustomerModel::new("customers", DistributionSchedule::always(1));
        open(&mut world, 0);
        customers.distribute(&ctx(0, &StubTraffic::default()), &mut world).unwrap();

        assert_eq!(customers.total_demand(&Scope::All, &world), 1.0);
        assert_close(customers.total_supply(&Scope::All, &world), 0.25);
        assert_close(customers.total_consumption(&Scope::All, &world), 0.25);
    }
}

// ── Commodity access ──────────────────────────────────────────────────────────

#[cfg(test)]
mod commodity {
    use br_business::{Factor, World, WorldBuilder};
    use br_core::{BusinessId, DistributionSchedule, ExposureId, Scope, Tick};
    use br_traffic::Accessibility;

    use super::helpers::{RecordingWiring, StubTraffic, ctx, open, params};
    use crate::{BusinessModel, CommodityModel};

    /// Business at exposure 10 with the given suppliers; a second business
    /// at exposure 11 has none.
    fn world(suppliers: &[u32]) -> (World, BusinessId, BusinessId) {
        let mut w = WorldBuilder::new();
        let shop = w.add_building("shop", ExposureId(10), "Z1", 0.0, None);
        let stall = w.add_building("stall", ExposureId(11), "Z1", 0.0, None);
        for &s in suppliers {
            w.add_building(format!("supplier{s}"), ExposureId(s), "Z1", 0.0, None);
        }
        let mut p = params();
        p.suppliers = suppliers.iter().copied().map(ExposureId).collect();
        let b = w.add_business(shop, p);
        let other = w.add_business(stall, params());
        (w.build().unwrap(), b, other)
    }

    fn model() -> CommodityModel {
        CommodityModel::new("commodities", DistributionSchedule::from_ticks([Tick(0), Tick(3)]).unwrap())
    }

    #[test]
    fn only_supplier_cut_off_closes_business() {
        let (mut world, b, other) = world(&[50]);
        let mut commodities = model();
        let mut traffic = StubTraffic::default();
        traffic.set(10, 50, Accessibility::Accessible);

        open(&mut world, 0);
        commodities.distribute(&ctx(0, &traffic), &mut world).unwrap();
        assert_eq!(world.business(b).unwrap().functionality_at(Tick(0)), Some(1.0));

        traffic.set(10, 50, Accessibility::Inaccessible);
        for t in 1..=3 {
            open(&mut world, t);
        }
        commodities.distribute(&ctx(3, &traffic), &mut world).unwrap();

        let business = world.business(b).unwrap();
        assert_eq!(business.functionality_at(Tick(3)), Some(0.0));
        assert_eq!(business.binding_factor(Tick(3)), Some(Factor::LocalSuppliers));
        assert_eq!(business.revenue_at(Tick(3)), Some(0.0));
        assert_eq!(world.business(other).unwrap().functionality_at(Tick(3)), Some(1.0));
        assert_eq!(commodities.has_access(b), Some(false));
        assert_eq!(commodities.has_access(other), None);
    }

    #[test]
    fn one_reachable_supplier_is_enough() {
        let (mut world, b, _) = world(&[50, 51, 52]);
        let mut commodities = model();
        let mut traffic = StubTraffic::default();
        traffic.set(10, 50, Accessibility::Inaccessible);
        traffic.set(51, 10, Accessibility::Accessible);
        traffic.set(10, 52, Accessibility::Inaccessible);

        open(&mut world, 0);
        commodities.distribute(&ctx(0, &traffic), &mut world).unwrap();
        assert_eq!(world.business(b).unwrap().functionality_at(Tick(0)), Some(1.0));
        assert!(world.business(b).unwrap().causal_log(Tick(0)).is_empty());

        // Now only the first supplier is reachable.
        traffic.set(10, 50, Accessibility::Accessible);
        traffic.set(51, 10, Accessibility::Inaccessible);
        for t in 1..=3 {
            open(&mut world, t);
        }
        commodities.distribute(&ctx(3, &traffic), &mut world).unwrap();
        assert_eq!(world.business(b).unwrap().functionality_at(Tick(3)), Some(1.0));
    }

    #[test]
    fn totals_count_businesses_with_suppliers() {
        let (mut world, _, _) = world(&[50]);
        let mut commodities = model();
        let mut traffic = StubTraffic::default();
        traffic.set(10, 50, Accessibility::Accessible);
        open(&mut world, 0);
        commodities.distribute(&ctx(0, &traffic), &mut world).unwrap();

        assert_eq!(commodities.total_demand(&Scope::All, &world), 1.0);
        assert_eq!(commodities.total_supply(&Scope::All, &world), 1.0);
        assert_eq!(commodities.total_consumption(&Scope::All, &world), 1.0);
    }

    #[test]
    fn unmapped_supplier_is_reported() {
        let (mut world, b, _) = world(&[50]);
        let mut commodities = model();
        let traffic = StubTraffic { unmapped: vec![ExposureId(50)], ..Default::default() };
        open(&mut world, 0);
        commodities.distribute(&ctx(0, &traffic), &mut world).unwrap();
        assert_eq!(world.business(b).unwrap().functionality_at(Tick(0)), Some(0.0));
        assert_eq!(commodities.diagnostics().len(), 1);
    }

    #[test]
    fn wiring_links_business_to_each_supplier() {
        let (world, _, _) = world(&[50, 51]);
        let mut wiring = RecordingWiring::default();
        model().wire(&world, &mut wiring).unwrap();
        assert_eq!(
            wiring.0,
            vec![(ExposureId(10), ExposureId(50)), (ExposureId(10), ExposureId(51))]
        );
    }
}
