//! The `Sim` struct and its tick loop.

use br_business::World;
use br_core::{Scope, SimClock, SimConfig, Tick};
use br_distribution::{BusinessModel, DistributionContext};
use br_traffic::{TrafficDistributionModel, TrafficSimulator};

use crate::{ComponentRecovery, ResilienceAggregator, SimObserver, SimResult, SystemSnapshot};

/// Supply, demand, and consumption of one resource across the whole system.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceTotals {
    pub resource:    String,
    pub demand:      f64,
    pub supply:      f64,
    pub consumption: f64,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<S, R>` holds all simulation state.  `S` is the traffic simulator,
/// `R` the component recovery hook; both are fixed at compile time.
///
/// Create via [`SimBuilder`][crate::SimBuilder], which also wires each
/// model's trips into the OD table before the first tick.
pub struct Sim<S: TrafficSimulator, R: ComponentRecovery> {
    /// Global configuration (total ticks, cutoffs, output interval, …).
    pub config: SimConfig,

    /// Simulation clock: tracks the current tick and maps to wall time.
    pub clock: SimClock,

    /// Every component and business.
    pub world: World,

    /// Owns the travel-time history read by every business model.
    pub traffic: TrafficDistributionModel<S>,

    /// Business models, distributed in this order every tick.
    pub models: Vec<Box<dyn BusinessModel>>,

    /// Sets component state at the start of each tick.
    pub recovery: R,

    pub resilience: ResilienceAggregator,
}

impl<S: TrafficSimulator, R: ComponentRecovery> Sim<S, R> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while self.clock.current_tick < self.config.end_tick() {
            self.step(observer)?;
        }
        observer.on_sim_end(self.clock.current_tick);
        tracing::info!(
            ticks = self.clock.current_tick.0,
            lost_revenue = self.resilience.lost_revenue(),
            "simulation complete"
        );
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Totals of traffic and every business model at the current state.
    pub fn resource_totals(&self) -> SimResult<Vec<ResourceTotals>> {
        let scope = Scope::All;
        let mut totals = Vec::with_capacity(self.models.len() + 1);
        totals.push(ResourceTotals {
            resource:    self.traffic.resource_name().to_owned(),
            demand:      self.traffic.total_demand(&scope)?,
            supply:      self.traffic.total_supply(&scope)?,
            consumption: self.traffic.total_consumption(&scope)?,
        });
        for m in &self.models {
            totals.push(ResourceTotals {
                resource:    m.resource_name().to_owned(),
                demand:      m.total_demand(&scope, &self.world),
                supply:      m.total_supply(&scope, &self.world),
                consumption: m.total_consumption(&scope, &self.world),
            });
        }
        Ok(totals)
    }

    /// Number of diagnostics recorded so far by traffic and every model.
    pub fn diagnostic_count(&self) -> usize {
        self.traffic.diagnostics().len()
            + self.models.iter().map(|m| m.diagnostics().len()).sum::<usize>()
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        let snapshot = self.process_tick(now)?;
        observer.on_tick_end(now, &snapshot);

        if self.config.output_interval_ticks > 0
            && now.0.is_multiple_of(self.config.output_interval_ticks)
        {
            let totals = self.resource_totals()?;
            observer.on_snapshot(now, &self.world, &snapshot, &totals);
        }
        self.clock.advance();
        Ok(())
    }

    fn process_tick(&mut self, now: Tick) -> SimResult<SystemSnapshot> {
        // ── Phase 1: component state for this tick ────────────────────────
        self.recovery.update(now, &mut self.world.components)?;

        // ── Phase 2: travel times ─────────────────────────────────────────
        // Before any business opens `now`, so a simulator failure leaves
        // every business at the previous tick.
        self.traffic.distribute(now, &self.world.components)?;

        // ── Phase 3: open the timestep for every business ─────────────────
        self.world.begin_timestep(now)?;

        // ── Phase 4: business models, in registration order ───────────────
        let ctx = DistributionContext::new(now, &self.traffic, self.config.cutoffs);
        for model in &mut self.models {
            model.distribute(&ctx, &mut self.world)?;
        }

        // ── Phase 5: roll up ──────────────────────────────────────────────
        let snapshot = self.resilience.update(now, &self.world).clone();
        tracing::debug!(
            tick = %now,
            revenue = snapshot.total_revenue,
            mean_functionality = snapshot.mean_functionality,
            "tick complete"
        );
        Ok(snapshot)
    }
}
