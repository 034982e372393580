//! Component damage and recovery over time.
//!
//! The business engine does not model how components recover; a
//! [`ComponentRecovery`] implementation sets each component's state at the
//! start of every tick.  [`ScheduledRecovery`] replays a fixed timeline,
//! which is enough for scenario studies and tests.

use std::collections::BTreeMap;

use br_core::{Component, ComponentId, CoreError, Tick};

use crate::SimResult;

pub trait ComponentRecovery {
    fn update(&mut self, tick: Tick, components: &mut [Component]) -> SimResult<()>;
}

/// Components keep whatever state they were built with.
pub struct NoRecovery;

impl ComponentRecovery for NoRecovery {
    fn update(&mut self, _tick: Tick, _components: &mut [Component]) -> SimResult<()> {
        Ok(())
    }
}

/// New state for one component.  `None` fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComponentUpdate {
    pub component:     ComponentId,
    pub functionality: Option<f64>,
    /// Current shelter capacity; ignored for components without one.
    pub shelter:       Option<f64>,
    pub met_demand:    Option<f64>,
}

impl ComponentUpdate {
    pub fn functionality(component: ComponentId, level: f64) -> Self {
        Self { component, functionality: Some(level), ..Default::default() }
    }

    pub fn with_shelter(mut self, current: f64) -> Self {
        self.shelter = Some(current);
        self
    }

    pub fn with_met_demand(mut self, share: f64) -> Self {
        self.met_demand = Some(share);
        self
    }
}

/// Tick-keyed component updates.
#[derive(Clone, Debug, Default)]
pub struct ScheduledRecovery {
    updates: BTreeMap<Tick, Vec<ComponentUpdate>>,
}

impl ScheduledRecovery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `update` at the start of `tick`.
    pub fn at(mut self, tick: Tick, update: ComponentUpdate) -> Self {
        self.updates.entry(tick).or_default().push(update);
        self
    }

    pub fn len(&self) -> usize {
        self.updates.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}

impl ComponentRecovery for ScheduledRecovery {
    fn update(&mut self, tick: Tick, components: &mut [Component]) -> SimResult<()> {
        let Some(updates) = self.updates.get(&tick) else { return Ok(()) };
        for u in updates {
            let c = components
                .get_mut(u.component.index())
                .ok_or(CoreError::ComponentNotFound(u.component))?;
            if let Some(f) = u.functionality {
                c.functionality = f;
            }
            if let Some(m) = u.met_demand {
                c.met_demand = m;
            }
            if let (Some(current), Some(shelter)) = (u.shelter, c.shelter_mut()) {
                shelter.current = current;
            }
        }
        tracing::debug!(%tick, updates = updates.len(), "component updates applied");
        Ok(())
    }
}
