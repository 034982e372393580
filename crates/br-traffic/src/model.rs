//! The traffic distribution model.

use std::borrow::Cow;

use br_core::{
    AccessCutoffs, Component, DiagnosticKind, Diagnostics, DistributionSchedule, ExposureId,
    NodeId, Scope, SimRng, Tick, TripId,
};

use crate::{
    Accessibility, CONSTANT_CATEGORY, ChangeFactorTable, ConsoleGuard, History, NetworkState,
    NodeMap, NodePopulation, SimulationRequest, SimulatorError, TrafficError, TrafficResult,
    TrafficSimulator, TravelTimeTable, TripRegistry, adjust_demand, check_access,
};

// ── Read/wire seams used by the business models ───────────────────────────────

/// Read access to the travel-time state.
pub trait TravelTimeSource {
    /// Accessibility from `from` to `to` using the nearest prior gated
    /// tick's tables.
    fn accessibility(
        &self,
        tick:    Tick,
        from:    NodeId,
        to:      NodeId,
        cutoffs: &AccessCutoffs,
    ) -> Accessibility;

    /// Nearest network node of a building.
    fn node_of(&self, exposure: ExposureId) -> Option<NodeId>;
}

/// Trip wiring between buildings, used while models are set up.
pub trait TripWiring {
    /// Make sure a trip exists between the nodes of two buildings.  Returns
    /// the id of a newly added trip; `None` when one already existed or a
    /// building is not mapped to a node.
    fn ensure_trip_between(
        &mut self,
        from: ExposureId,
        to:   ExposureId,
    ) -> TrafficResult<Option<TripId>>;
}

// ── Demand adjustment ─────────────────────────────────────────────────────────

struct DemandAdjustment {
    rng:                 SimRng,
    constant_categories: Vec<String>,
    baseline:            Option<NodePopulation>,
}

// ── TrafficDistributionModel ──────────────────────────────────────────────────

/// Owns the travel-time and change-factor histories and decides when the
/// simulator runs.
///
/// # Type parameter
///
/// `S` is the simulator; swap it at compile time for a different engine.
pub struct TrafficDistributionModel<S: TrafficSimulator> {
    resource_name:     String,
    schedule:          DistributionSchedule,
    simulator:         S,
    registry:          TripRegistry,
    node_map:          NodeMap,
    travel_times:      History<TravelTimeTable>,
    change_factors:    History<ChangeFactorTable>,
    /// Change-ratio cutoff for counting a trip as completed.
    trip_cutoff_ratio: f64,
    demand:            Option<DemandAdjustment>,
    diagnostics:       Diagnostics,
}

impl<S: TrafficSimulator> TrafficDistributionModel<S> {
    /// # Errors
    ///
    /// [`TrafficError::MissingBaseline`] if `schedule` does not contain
    /// tick 0, which every change factor is measured against.
    pub fn new(
        resource_name:     impl Into<String>,
        schedule:          DistributionSchedule,
        simulator:         S,
        registry:          TripRegistry,
        node_map:          NodeMap,
        trip_cutoff_ratio: f64,
    ) -> TrafficResult<Self> {
        if !schedule.contains(Tick::ZERO) {
            return Err(TrafficError::MissingBaseline);
        }
        let resource_name = resource_name.into();
        Ok(Self {
            diagnostics: Diagnostics::new(resource_name.clone()),
            resource_name,
            schedule,
            simulator,
            registry,
            node_map,
            travel_times: History::new(),
            change_factors: History::new(),
            trip_cutoff_ratio,
            demand: None,
        })
    }

    /// Scale OD demand with node population before each simulation.
    /// `CONSTANT` trips are always kept, plus any extra categories given.
    pub fn with_demand_adjustment(mut self, rng: SimRng, extra_constant: &[&str]) -> Self {
        let mut constant_categories = vec![CONSTANT_CATEGORY.to_owned()];
        constant_categories.extend(extra_constant.iter().map(|c| (*c).to_owned()));
        self.demand = Some(DemandAdjustment { rng, constant_categories, baseline: None });
        self
    }

    // ── Per-tick entry point ──────────────────────────────────────────────

    /// Advance both histories by one tick.
    ///
    /// Ungated ticks only append placeholders.  Gated ticks run the
    /// simulator with its console silenced and store the result and its
    /// change factors against tick 0.
    ///
    /// # Errors
    ///
    /// - [`TrafficError::TimestepOutOfOrder`] unless `tick` equals the
    ///   history length.
    /// - [`TrafficError::Simulator`] when the simulator fails or returns
    ///   malformed data.  Nothing is recorded for the tick.
    pub fn distribute(&mut self, tick: Tick, components: &[Component]) -> TrafficResult<()> {
        let expected = self.travel_times.next_tick();
        if tick != expected {
            return Err(TrafficError::TimestepOutOfOrder { expected, got: tick });
        }

        if !self.schedule.contains(tick) {
            self.travel_times.skip();
            self.change_factors.skip();
            tracing::trace!(resource = %self.resource_name, %tick, "ungated");
            return Ok(());
        }

        let network = NetworkState::from_components(tick, components, &self.node_map);
        let trips: Cow<'_, [_]> = match self.demand.as_mut() {
            None => Cow::Borrowed(self.registry.rows()),
            Some(adj) => {
                let current = NodePopulation::from_network(&network);
                let baseline = adj.baseline.get_or_insert_with(|| current.clone());
                let registry = &self.registry;
                Cow::Owned(adjust_demand(
                    registry.rows(),
                    baseline,
                    &current,
                    &adj.constant_categories,
                    |t| registry.is_protected(t.origin_nid, t.destin_nid),
                    &mut adj.rng,
                    tick,
                    &mut self.diagnostics,
                ))
            }
        };

        let request = SimulationRequest { tick, network: &network, trips: &trips };
        let records = {
            let mut simulator = ConsoleGuard::new(&mut self.simulator);
            simulator.simulate(&request)
        }
        .map_err(|source| TrafficError::Simulator { tick, source })?;

        let table = TravelTimeTable::new(records);
        table.validate().map_err(|msg| TrafficError::Simulator {
            tick,
            source: SimulatorError::Malformed(msg),
        })?;

        let baseline = self.travel_times.baseline().unwrap_or(&table);
        let (factors, unknown) = ChangeFactorTable::compute(baseline, &table);
        for trip in unknown {
            self.diagnostics.record(Some(tick), DiagnosticKind::UnknownChangeFactor { trip });
        }

        tracing::debug!(
            resource = %self.resource_name,
            %tick,
            trips = trips.len(),
            results = table.len(),
            "traffic distributed"
        );
        self.travel_times.record(table);
        self.change_factors.record(factors);
        Ok(())
    }

    // ── Totals ────────────────────────────────────────────────────────────

    fn require_all(scope: &Scope) -> TrafficResult<()> {
        match scope {
            Scope::All => Ok(()),
            other => Err(TrafficError::UnsupportedScope(other.to_string())),
        }
    }

    /// Trips requested at the most recent tick; 0 if it was ungated or
    /// nothing has been distributed.
    pub fn total_demand(&self, scope: &Scope) -> TrafficResult<f64> {
        Self::require_all(scope)?;
        Ok(self.travel_times.last_slot().map_or(0.0, |t| t.len() as f64))
    }

    /// Trips at the most recent tick whose change factor is within the trip
    /// cutoff ratio.
    pub fn total_consumption(&self, scope: &Scope) -> TrafficResult<f64> {
        Self::require_all(scope)?;
        Ok(self
            .change_factors
            .last_slot()
            .map_or(0.0, |f| f.completed_trips(self.trip_cutoff_ratio) as f64))
    }

    /// Equal to consumption: the network has no notion of spare capacity.
    pub fn total_supply(&self, scope: &Scope) -> TrafficResult<f64> {
        self.total_consumption(scope)
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    /// The latest scheduled tick at or before `tick`.
    pub fn nearest_prior_distribution_tick(&self, tick: Tick) -> Option<Tick> {
        self.schedule.nearest_prior(tick)
    }

    /// Travel times in effect at `tick`.
    pub fn travel_times_at(&self, tick: Tick) -> Option<&TravelTimeTable> {
        self.travel_times.get(self.nearest_prior_distribution_tick(tick)?)
    }

    /// Change factors in effect at `tick`.
    pub fn change_factors_at(&self, tick: Tick) -> Option<&ChangeFactorTable> {
        self.change_factors.get(self.nearest_prior_distribution_tick(tick)?)
    }

    pub fn travel_time_history(&self) -> &History<TravelTimeTable> {
        &self.travel_times
    }

    pub fn change_factor_history(&self) -> &History<ChangeFactorTable> {
        &self.change_factors
    }

    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    pub fn schedule(&self) -> &DistributionSchedule {
        &self.schedule
    }

    pub fn registry(&self) -> &TripRegistry {
        &self.registry
    }

    pub fn node_map(&self) -> &NodeMap {
        &self.node_map
    }

    pub fn simulator(&self) -> &S {
        &self.simulator
    }

    pub fn simulator_mut(&mut self) -> &mut S {
        &mut self.simulator
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

impl<S: TrafficSimulator> TravelTimeSource for TrafficDistributionModel<S> {
    fn accessibility(
        &self,
        tick:    Tick,
        from:    NodeId,
        to:      NodeId,
        cutoffs: &AccessCutoffs,
    ) -> Accessibility {
        match (self.travel_times_at(tick), self.change_factors_at(tick)) {
            (Some(times), Some(factors)) => check_access(times, factors, from, to, cutoffs),
            _ => Accessibility::NoData,
        }
    }

    fn node_of(&self, exposure: ExposureId) -> Option<NodeId> {
        self.node_map.get(exposure)
    }
}

impl<S: TrafficSimulator> TripWiring for TrafficDistributionModel<S> {
    fn ensure_trip_between(
        &mut self,
        from: ExposureId,
        to:   ExposureId,
    ) -> TrafficResult<Option<TripId>> {
        let mut node = |exposure| {
            let node = self.node_map.get(exposure);
            if node.is_none() {
                self.diagnostics.record(None, DiagnosticKind::UnmappedBuilding { exposure });
            }
            node
        };
        let (Some(origin), Some(destination)) = (node(from), node(to)) else {
            return Ok(None);
        };
        self.registry.ensure_trip(origin, destination, CONSTANT_CATEGORY)
    }
}
