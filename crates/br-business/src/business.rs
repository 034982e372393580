//! The `Business` state machine.

use std::collections::BTreeMap;

use br_core::{BusinessId, ComponentId, Tick};

use crate::{BusinessError, BusinessParams, BusinessResult, CausalEntry, Factor};

/// Days per year used to turn annual sales into a daily revenue baseline.
const DAYS_PER_YEAR: f64 = 365.0;

/// One business anchored to a home building.
///
/// All dynamic state is keyed by tick and append-only: a timestep is opened
/// with [`begin_timestep`](Self::begin_timestep), receives any number of
/// [`apply_factor`](Self::apply_factor) calls, and is never reopened.
#[derive(Clone, Debug)]
pub struct Business {
    pub id:     BusinessId,
    /// Back-reference to the home building; the building owns the business.
    pub home:   ComponentId,
    pub params: BusinessParams,

    /// The timestep currently accepting factors.
    open:    Option<Tick>,
    /// Functionality within the open timestep.
    current: f64,

    functionality:         BTreeMap<Tick, f64>,
    causal_log:            BTreeMap<Tick, Vec<CausalEntry>>,
    employee_availability: BTreeMap<Tick, f64>,
    customer_base:         BTreeMap<Tick, f64>,
    revenue:               BTreeMap<Tick, f64>,
}

impl Business {
    pub fn new(id: BusinessId, home: ComponentId, params: BusinessParams) -> Self {
        Self {
            id,
            home,
            params,
            open:                  None,
            current:               1.0,
            functionality:         BTreeMap::new(),
            causal_log:            BTreeMap::new(),
            employee_availability: BTreeMap::new(),
            customer_base:         BTreeMap::new(),
            revenue:               BTreeMap::new(),
        }
    }

    // ── Timestep lifecycle ────────────────────────────────────────────────

    /// Open timestep `tick`: reset functionality to 1.0, start an empty
    /// causal log, and apply the home building's functionality as the first
    /// factor.
    ///
    /// # Errors
    ///
    /// [`BusinessError::RetroactiveTimestep`] if `tick` is not after the last
    /// timestep already recorded.
    pub fn begin_timestep(&mut self, tick: Tick, home_functionality: f64) -> BusinessResult<()> {
        if let Some(last) = self.last_tick() {
            if tick <= last {
                return Err(BusinessError::RetroactiveTimestep { business: self.id, tick, last });
            }
        }
        self.open    = Some(tick);
        self.current = 1.0;
        self.functionality.insert(tick, 1.0);
        self.causal_log.insert(tick, Vec::new());
        self.apply_factor(tick, home_functionality, Factor::HomeComponent)?;
        Ok(())
    }

    /// Apply one functionality factor to the open timestep.
    ///
    /// Lowers functionality to `level` when it is below the current value
    /// and logs `{factor, level}`; otherwise leaves no trace.  Revenue for
    /// the timestep is recomputed either way.  Returns `true` when the factor
    /// was binding.
    ///
    /// `level` is clamped to `[0, 1]`.
    pub fn apply_factor(&mut self, tick: Tick, level: f64, factor: Factor) -> BusinessResult<bool> {
        if self.open != Some(tick) {
            return Err(BusinessError::TimestepNotOpen { business: self.id, tick, open: self.open });
        }
        if level.is_nan() {
            return Err(BusinessError::LevelOutOfRange { business: self.id, level });
        }
        let level = level.clamp(0.0, 1.0);

        let binding = level < self.current;
        if binding {
            self.current = level;
            self.functionality.insert(tick, level);
            self.causal_log
                .entry(tick)
                .or_default()
                .push(CausalEntry { factor, level });
        }
        self.update_revenue(tick);
        Ok(binding)
    }

    /// `revenue[t] = min(revenue[0] × functionality, revenue[t] or +∞)`.
    fn update_revenue(&mut self, tick: Tick) {
        let candidate = self.revenue_reference(tick) * self.current;
        let entry = self.revenue.entry(tick).or_insert(f64::INFINITY);
        *entry = entry.min(candidate);
    }

    /// Revenue the business would earn at full functionality on `tick`:
    /// the recorded tick-0 revenue, or the daily sales baseline when tick 0
    /// is the one being computed (or was never simulated).
    fn revenue_reference(&self, tick: Tick) -> f64 {
        if tick == Tick::ZERO {
            return self.baseline_daily_revenue();
        }
        self.revenue
            .get(&Tick::ZERO)
            .copied()
            .unwrap_or_else(|| self.baseline_daily_revenue())
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// Annual sales ÷ 365.
    pub fn baseline_daily_revenue(&self) -> f64 {
        self.params.annual_sales / DAYS_PER_YEAR
    }

    /// The most recently opened timestep.
    pub fn last_tick(&self) -> Option<Tick> {
        self.functionality.keys().next_back().copied()
    }

    pub fn open_tick(&self) -> Option<Tick> {
        self.open
    }

    /// Functionality within the most recent timestep (1.0 before any).
    pub fn current_functionality(&self) -> f64 {
        self.current
    }

    pub fn functionality_at(&self, tick: Tick) -> Option<f64> {
        self.functionality.get(&tick).copied()
    }

    pub fn revenue_at(&self, tick: Tick) -> Option<f64> {
        self.revenue.get(&tick).copied()
    }

    /// Binding constraints recorded during `tick`, in application order.
    pub fn causal_log(&self, tick: Tick) -> &[CausalEntry] {
        self.causal_log.get(&tick).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The tightest constraint of `tick`, if any factor was binding.
    pub fn binding_factor(&self, tick: Tick) -> Option<Factor> {
        self.causal_log(tick).last().map(|e| e.factor)
    }

    pub fn functionality_history(&self) -> impl Iterator<Item = (Tick, f64)> + '_ {
        self.functionality.iter().map(|(t, f)| (*t, *f))
    }

    pub fn revenue_history(&self) -> impl Iterator<Item = (Tick, f64)> + '_ {
        self.revenue.iter().map(|(t, r)| (*t, *r))
    }

    // ── Labor ─────────────────────────────────────────────────────────────

    pub fn record_employee_availability(&mut self, tick: Tick, ratio: f64) {
        self.employee_availability.insert(tick, ratio);
    }

    pub fn employee_availability(&self, tick: Tick) -> Option<f64> {
        self.employee_availability.get(&tick).copied()
    }

    pub fn latest_employee_availability(&self) -> Option<f64> {
        self.employee_availability.values().next_back().copied()
    }

    /// A business still needs labor while it retains any functionality.
    pub fn needs_employees(&self) -> bool {
        self.current > 0.0
    }

    pub fn employee_demand(&self) -> u32 {
        if self.needs_employees() { self.params.employee_count } else { 0 }
    }

    /// `floor(last availability ratio × employee count)`; 0 before the first
    /// labor distribution.
    pub fn employee_supply(&self) -> u32 {
        self.latest_employee_availability()
            .map_or(0, |r| (r * self.params.employee_count as f64).floor() as u32)
    }

    pub fn employee_consumption(&self) -> u32 {
        self.employee_demand().min(self.employee_supply())
    }

    // ── Customers ─────────────────────────────────────────────────────────

    pub fn record_customer_base(&mut self, tick: Tick, ratio: f64) {
        self.customer_base.insert(tick, ratio);
    }

    pub fn customer_base(&self, tick: Tick) -> Option<f64> {
        self.customer_base.get(&tick).copied()
    }

    pub fn latest_customer_base(&self) -> Option<f64> {
        self.customer_base.values().next_back().copied()
    }

    pub fn customer_base_history(&self) -> impl Iterator<Item = (Tick, f64)> + '_ {
        self.customer_base.iter().map(|(t, r)| (*t, *r))
    }
}
