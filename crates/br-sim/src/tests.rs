//! Integration tests for br-sim.
//!
//! A small island: four employee homes, a shop, and a supplier.  Homes 1
//! and 2 and the supplier sit across a bridge; while the bridge is down,
//! every trip touching them takes ten times longer.

use std::io::Write;

use br_business::{BusinessParams, Factor, World, WorldBuilder};
use br_core::{
    BusinessId, ComponentId, DistributionSchedule, ExposureId, LinkKind, NodeId, SimConfig, Tick,
};
use br_traffic::{
    Console, MemoryTripStore, NodeMap, SimulationRequest, SimulatorError,
    TrafficDistributionModel, TrafficSimulator, TravelTimeRecord, TripRegistry,
};

use crate::{
    ComponentUpdate, NoRecovery, NoopObserver, ScheduledRecovery, Sim, SimBuilder, SimError,
    SimObserver, SystemSnapshot,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

const ACROSS_BRIDGE: [u32; 3] = [1, 2, 20];

struct BridgeSimulator {
    console: Console,
    fail_at: Option<Tick>,
    calls:   Vec<(Tick, usize)>,
}

impl BridgeSimulator {
    fn new() -> Self {
        Self { console: Console::new(Box::new(std::io::sink())), fail_at: None, calls: Vec::new() }
    }
}

impl TrafficSimulator for BridgeSimulator {
    fn simulate(
        &mut self,
        request: &SimulationRequest<'_>,
    ) -> Result<Vec<TravelTimeRecord>, SimulatorError> {
        writeln!(self.console, "assigning {} trips", request.trips.len())?;
        self.calls.push((request.tick, request.trips.len()));
        if self.fail_at == Some(request.tick) {
            return Err(SimulatorError::Malformed("truncated output".into()));
        }
        let bridge = request.network.link_functionality("bridge").unwrap_or(1.0);
        Ok(request
            .trips
            .iter()
            .map(|t| {
                let crosses = ACROSS_BRIDGE.contains(&t.origin_nid.0)
                    || ACROSS_BRIDGE.contains(&t.destin_nid.0);
                let slowdown = if crosses && bridge < 0.5 { 10.0 } else { 1.0 };
                TravelTimeRecord {
                    trip:             t.agent_id,
                    origin:           t.origin_nid,
                    destination:      t.destin_nid,
                    travel_time_secs: 1_000.0 * slowdown,
                }
            })
            .collect())
    }

    fn redirect_console(&mut self, out: Box<dyn Write + Send>) -> Box<dyn Write + Send> {
        self.console.replace(out)
    }
}

fn test_config(total_ticks: u64) -> SimConfig {
    SimConfig { total_ticks, ..SimConfig::default() }
}

/// Returns the world, the business, and the bridge component.
fn island() -> (World, BusinessId, ComponentId) {
    let mut w = WorldBuilder::new();
    for e in 1..=4 {
        w.add_building(format!("home{e}"), ExposureId(e), "Z1", 4.0, Some(4.0));
    }
    let shop = w.add_building("shop", ExposureId(10), "Z1", 0.0, None);
    w.add_building("supplier", ExposureId(20), "Z2", 0.0, None);
    let bridge = w.add_link("bridge", LinkKind::Bridge);
    let b = w.add_business(shop, BusinessParams {
        company_name:   "Harbor Hardware".into(),
        employee_count: 4,
        annual_sales:   365_000.0,
        suppliers:      vec![ExposureId(20)],
        employee_homes: (1..=4).map(ExposureId).collect(),
        ..Default::default()
    });
    (w.build().unwrap(), b, bridge)
}

fn traffic(total_ticks: u64) -> TrafficDistributionModel<BridgeSimulator> {
    let node_map = NodeMap::from_pairs([1, 2, 3, 4, 10, 20].map(|e| (ExposureId(e), NodeId(e))));
    TrafficDistributionModel::new(
        "Traffic",
        DistributionSchedule::always(total_ticks),
        BridgeSimulator::new(),
        TripRegistry::open(Box::new(MemoryTripStore::default())).unwrap(),
        node_map,
        2.0,
    )
    .unwrap()
}

/// Bridge out at tick 1, back at tick 3.
fn bridge_outage(bridge: ComponentId) -> ScheduledRecovery {
    ScheduledRecovery::new()
        .at(Tick(1), ComponentUpdate::functionality(bridge, 0.0))
        .at(Tick(3), ComponentUpdate::functionality(bridge, 1.0))
}

fn island_sim(total_ticks: u64) -> (Sim<BridgeSimulator, ScheduledRecovery>, BusinessId) {
    let (world, b, bridge) = island();
    let schedule = DistributionSchedule::always(total_ticks);
    let sim = SimBuilder::new(test_config(total_ticks), world, traffic(total_ticks), bridge_outage(bridge))
        .labor(schedule.clone())
        .customers(schedule.clone())
        .commodities(schedule)
        .build()
        .unwrap();
    (sim, b)
}

// ── SimBuilder ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn wiring_injects_trips_before_first_tick() {
        let (mut sim, _) = island_sim(1);
        // Four employee trips plus one supplier trip.
        assert_eq!(sim.traffic.registry().len(), 5);
        assert!(sim.traffic.registry().rows().iter().all(|r| r.is_constant()));

        sim.run(&mut NoopObserver).unwrap();
        assert_eq!(sim.traffic.simulator().calls, vec![(Tick(0), 5)]);
    }

    #[test]
    fn duplicate_resource_names_rejected() {
        let (world, _, _) = island();
        let result = SimBuilder::new(test_config(3), world, traffic(3), NoRecovery)
            .labor(DistributionSchedule::always(3))
            .labor(DistributionSchedule::always(3))
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn zero_ticks_rejected() {
        let (world, _, _) = island();
        let result = SimBuilder::new(test_config(0), world, traffic(1), NoRecovery).build();
        assert!(result.is_err());
    }
}

// ── Running ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;

    #[test]
    fn runs_to_end_tick() {
        let (mut sim, _) = island_sim(5);
        sim.run(&mut NoopObserver).unwrap();
        assert_eq!(sim.clock.current_tick, Tick(5));
        assert_eq!(sim.resilience.snapshots().len(), 5);
        assert_eq!(sim.traffic.travel_time_history().len(), 5);
    }

    #[test]
    fn run_ticks_advances_clock() {
        let (mut sim, _) = island_sim(10);
        sim.run_ticks(2, &mut NoopObserver).unwrap();
        sim.run_ticks(3, &mut NoopObserver).unwrap();
        assert_eq!(sim.clock.current_tick, Tick(5));
    }

    #[test]
    fn bridge_outage_closes_and_reopens_business() {
        let (mut sim, b) = island_sim(5);
        sim.run(&mut NoopObserver).unwrap();
        let business = sim.world.business(b).unwrap();

        assert_eq!(business.functionality_at(Tick(0)), Some(1.0));
        assert_eq!(business.employee_availability(Tick(1)), Some(0.5));
        assert_eq!(business.functionality_at(Tick(1)), Some(0.0));
        assert_eq!(business.binding_factor(Tick(1)), Some(Factor::LocalSuppliers));
        let log: Vec<_> = business.causal_log(Tick(1)).iter().map(|e| e.factor).collect();
        assert_eq!(log, vec![Factor::Labor, Factor::LocalSuppliers]);
        assert_eq!(business.functionality_at(Tick(3)), Some(1.0));

        let res = &sim.resilience;
        assert_eq!(res.min_snapshot().map(|s| s.tick), Some(Tick(1)));
        assert_eq!(res.recovery_tick(0.99), Some(Tick(3)));
        assert!((res.lost_revenue() - 2_000.0).abs() < 1e-6);
        assert_eq!(res.business_revenue(b).len(), 5);
        assert_eq!(res.business_functionality(b)[2], (Tick(2), 0.0));
    }

    #[test]
    fn simulator_failure_stops_the_run() {
        let (mut sim, b) = island_sim(5);
        sim.traffic.simulator_mut().fail_at = Some(Tick(2));
        let err = sim.run(&mut NoopObserver).unwrap_err();
        assert!(matches!(err, SimError::Traffic(br_traffic::TrafficError::Simulator { .. })));
        assert_eq!(sim.clock.current_tick, Tick(2));
        assert_eq!(sim.resilience.snapshots().len(), 2);

        // The failed tick was never opened.
        let business = sim.world.business(b).unwrap();
        assert_eq!(business.last_tick(), Some(Tick(1)));
        assert_eq!(business.functionality_at(Tick(2)), None);
    }

    #[test]
    fn resource_totals_cover_every_model() {
        let (mut sim, _) = island_sim(2);
        sim.run_ticks(2, &mut NoopObserver).unwrap();
        let totals = sim.resource_totals().unwrap();
        let names: Vec<_> = totals.iter().map(|t| t.resource.as_str()).collect();
        assert_eq!(names, vec!["Traffic", "Labor", "Customers", "Commodities"]);

        // Tick 1: bridge out.  Three trips cross it and are degraded ×10.
        assert_eq!(totals[0].demand, 5.0);
        assert_eq!(totals[0].consumption, 2.0);
        // Business is closed so it needs no labor; two of four employees
        // can reach it.
        assert_eq!(totals[1].demand, 0.0);
        assert_eq!(totals[1].supply, 2.0);
        assert_eq!(totals[3].supply, 0.0);
    }

    /// Observer that counts ticks and snapshots.
    #[derive(Default)]
    struct Counter {
        starts:    usize,
        ends:      usize,
        snapshots: Vec<Tick>,
        ended_at:  Option<Tick>,
    }

    impl SimObserver for Counter {
        fn on_tick_start(&mut self, _t: Tick) { self.starts += 1; }
        fn on_tick_end(&mut self, _t: Tick, _s: &SystemSnapshot) { self.ends += 1; }
        fn on_snapshot(
            &mut self,
            t:       Tick,
            _w:      &World,
            _s:      &SystemSnapshot,
            totals:  &[crate::ResourceTotals],
        ) {
            assert_eq!(totals.len(), 4);
            self.snapshots.push(t);
        }
        fn on_sim_end(&mut self, t: Tick) { self.ended_at = Some(t); }
    }

    #[test]
    fn observer_hooks_follow_output_interval() {
        let (world, _, bridge) = island();
        let config = SimConfig { output_interval_ticks: 2, ..test_config(5) };
        let mut sim = SimBuilder::new(config, world, traffic(5), bridge_outage(bridge))
            .labor(DistributionSchedule::every(2, 5))
            .customers(DistributionSchedule::every(2, 5))
            .commodities(DistributionSchedule::every(2, 5))
            .build()
            .unwrap();
        let mut obs = Counter::default();
        sim.run(&mut obs).unwrap();
        assert_eq!((obs.starts, obs.ends), (5, 5));
        assert_eq!(obs.snapshots, vec![Tick(0), Tick(2), Tick(4)]);
        assert_eq!(obs.ended_at, Some(Tick(5)));
    }
}

// ── Recovery ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod recovery_tests {
    use super::*;
    use crate::ComponentRecovery;

    #[test]
    fn scheduled_updates_apply_on_their_tick() {
        let (mut world, _, _) = island();
        let home = ComponentId(0);
        let mut recovery = ScheduledRecovery::new().at(
            Tick(2),
            ComponentUpdate::functionality(home, 0.3).with_shelter(1.0).with_met_demand(0.5),
        );
        assert_eq!(recovery.len(), 1);

        recovery.update(Tick(1), &mut world.components).unwrap();
        assert_eq!(world.components[0].functionality, 1.0);

        recovery.update(Tick(2), &mut world.components).unwrap();
        let c = &world.components[0];
        assert_eq!(c.functionality, 0.3);
        assert_eq!(c.met_demand, 0.5);
        assert_eq!(c.shelter().unwrap().current, 1.0);
        assert_eq!(c.shelter().unwrap().initial, 4.0);
    }

    #[test]
    fn unknown_component_is_an_error() {
        let (mut world, _, _) = island();
        let mut recovery =
            ScheduledRecovery::new().at(Tick(0), ComponentUpdate::functionality(ComponentId(99), 0.0));
        assert!(matches!(
            recovery.update(Tick(0), &mut world.components),
            Err(SimError::Core(br_core::CoreError::ComponentNotFound(ComponentId(99))))
        ));
    }

    #[test]
    fn unmet_infrastructure_demand_constrains_business() {
        let (world, b, _) = island();
        let shop = world.business(b).unwrap().home;
        let recovery = ScheduledRecovery::new()
            .at(Tick(1), ComponentUpdate { component: shop, met_demand: Some(0.7), ..Default::default() });
        let mut sim = SimBuilder::new(test_config(2), world, traffic(2), recovery).build().unwrap();
        sim.run(&mut NoopObserver).unwrap();
        let business = sim.world.business(b).unwrap();
        assert_eq!(business.functionality_at(Tick(1)), Some(0.7));
        assert_eq!(business.binding_factor(Tick(1)), Some(Factor::Infrastructure));
    }
}

// ── Resilience ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod resilience_tests {
    use super::*;
    use crate::ResilienceAggregator;

    #[test]
    fn snapshot_rolls_up_businesses() {
        let (mut world, b, _) = island();
        world.begin_timestep(Tick(0)).unwrap();
        world.business_mut(b).unwrap().apply_factor(Tick(0), 0.25, Factor::Labor).unwrap();

        let mut agg = ResilienceAggregator::new();
        let s = agg.update(Tick(0), &world).clone();
        assert_eq!(s.total_revenue, 250.0);
        assert_eq!(s.baseline_revenue, 1_000.0);
        assert_eq!(s.mean_functionality, 0.25);
        assert_eq!(s.nonfunctional_businesses, 0);
        assert_eq!(s.binding_factors.get(&Factor::Labor), Some(&1));
        assert_eq!(s.revenue_ratio(), 0.25);
    }

    #[test]
    fn recovery_tick_requires_staying_recovered() {
        let (mut world, b, _) = island();
        let mut agg = ResilienceAggregator::new();
        for (t, level) in [1.0, 0.2, 1.0, 0.5, 0.95].into_iter().enumerate() {
            let tick = Tick(t as u64);
            world.begin_timestep(tick).unwrap();
            world.business_mut(b).unwrap().apply_factor(tick, level, Factor::Labor).unwrap();
            agg.update(tick, &world);
        }
        assert_eq!(agg.recovery_tick(0.9), Some(Tick(4)));
        assert_eq!(agg.recovery_tick(0.99), None);
        assert_eq!(agg.min_snapshot().map(|s| s.tick), Some(Tick(1)));
        assert!((agg.lost_revenue() - (800.0 + 500.0 + 50.0)).abs() < 1e-6);
    }

    #[test]
    fn empty_world_is_fully_functional() {
        let world = WorldBuilder::new().build().unwrap();
        let mut agg = ResilienceAggregator::new();
        let s = agg.update(Tick(0), &world);
        assert_eq!(s.mean_functionality, 1.0);
        assert_eq!(s.revenue_ratio(), 1.0);
    }
}
