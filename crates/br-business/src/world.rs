//! The `World` arena: every component and every business, indexed by ID.
//!
//! Buildings own their businesses (`Building::businesses`); each business
//! holds its home building's `ComponentId`.  Both live in flat `Vec`s indexed
//! by their ID, so lookups are O(1) and there are no reference cycles.

use std::collections::HashMap;

use br_core::{
    Building, BusinessId, Component, ComponentId, ComponentKind, CoreError, ExposureId, LinkKind,
    ShelterCapacity, Tick, ZoneId,
};

use crate::{Business, BusinessError, BusinessParams, BusinessResult, Factor};

// ── World ─────────────────────────────────────────────────────────────────────

pub struct World {
    /// Indexed by `ComponentId`.
    pub components: Vec<Component>,
    /// Indexed by `BusinessId`.
    pub businesses: Vec<Business>,
    by_exposure:    HashMap<ExposureId, ComponentId>,
}

impl World {
    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(id.index())
    }

    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.components.get_mut(id.index())
    }

    pub fn business(&self, id: BusinessId) -> Option<&Business> {
        self.businesses.get(id.index())
    }

    pub fn business_mut(&mut self, id: BusinessId) -> Option<&mut Business> {
        self.businesses.get_mut(id.index())
    }

    /// The building with the given exposure id.
    pub fn building_by_exposure(&self, exposure: ExposureId) -> Option<&Component> {
        self.by_exposure
            .get(&exposure)
            .and_then(|id| self.component(*id))
    }

    /// Home building of `business`.
    pub fn home_of(&self, business: &Business) -> Option<&Component> {
        self.component(business.home)
    }

    /// Exposure id of the home building of `business`.
    pub fn home_exposure(&self, business: &Business) -> Option<ExposureId> {
        self.home_of(business).and_then(Component::exposure_id)
    }

    pub fn buildings(&self) -> impl Iterator<Item = (&Component, &Building)> {
        self.components
            .iter()
            .filter_map(|c| c.as_building().map(|b| (c, b)))
    }

    /// Open `tick` for every business: reset functionality, apply the home
    /// building's functionality, then its unmet infrastructure demand.
    pub fn begin_timestep(&mut self, tick: Tick) -> BusinessResult<()> {
        let components = &self.components;
        for business in &mut self.businesses {
            let home = components
                .get(business.home.index())
                .ok_or(CoreError::ComponentNotFound(business.home))?;
            business.begin_timestep(tick, home.functionality)?;
            if home.met_demand < 1.0 {
                business.apply_factor(tick, home.met_demand, Factor::Infrastructure)?;
            }
        }
        Ok(())
    }
}

// ── WorldBuilder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`World`].
///
/// Components get consecutive `ComponentId`s and businesses consecutive
/// `BusinessId`s in insertion order.  Ownership links (building → business)
/// are filled in by [`build`](Self::build).
///
/// ```rust
/// use br_business::{BusinessParams, WorldBuilder};
/// use br_core::ExposureId;
///
/// let mut b = WorldBuilder::new();
/// let shop = b.add_building("shop", ExposureId(1), "Z1", 0.0, None);
/// b.add_business(shop, BusinessParams { employee_count: 3, annual_sales: 365.0, ..Default::default() });
/// let world = b.build().unwrap();
/// assert_eq!(world.component(shop).unwrap().businesses().len(), 1);
/// ```
#[derive(Default)]
pub struct WorldBuilder {
    components: Vec<Component>,
    businesses: Vec<(ComponentId, BusinessParams)>,
}

impl WorldBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_component_id(&self) -> ComponentId {
        ComponentId(self.components.len() as u32)
    }

    /// Add a building.  `shelter` is its initial shelter capacity, `None`
    /// for buildings that house nobody.
    pub fn add_building(
        &mut self,
        name:       impl Into<String>,
        exposure:   ExposureId,
        zone:       impl Into<String>,
        population: f64,
        shelter:    Option<f64>,
    ) -> ComponentId {
        let id = self.next_component_id();
        let building = Building {
            exposure_id: exposure,
            zone:        ZoneId::new(zone),
            population,
            shelter:     shelter.map(ShelterCapacity::new),
            businesses:  Vec::new(),
        };
        self.components.push(Component::new(id, name, ComponentKind::Building(building)));
        id
    }

    pub fn add_link(&mut self, name: impl Into<String>, kind: LinkKind) -> ComponentId {
        let id = self.next_component_id();
        self.components.push(Component::new(id, name, ComponentKind::Link(kind)));
        id
    }

    pub fn add_pipe(&mut self, name: impl Into<String>) -> ComponentId {
        let id = self.next_component_id();
        self.components.push(Component::new(id, name, ComponentKind::Pipe));
        id
    }

    pub fn add_business(&mut self, home: ComponentId, params: BusinessParams) -> BusinessId {
        let id = BusinessId(self.businesses.len() as u32);
        self.businesses.push((home, params));
        id
    }

    /// Validate homes and exposure ids and construct the [`World`].
    pub fn build(self) -> BusinessResult<World> {
        let mut components = self.components;

        let mut by_exposure = HashMap::new();
        for c in &components {
            if let Some(exposure) = c.exposure_id() {
                if by_exposure.insert(exposure, c.id).is_some() {
                    return Err(BusinessError::DuplicateExposure(exposure));
                }
            }
        }

        let mut businesses = Vec::with_capacity(self.businesses.len());
        for (i, (home, params)) in self.businesses.into_iter().enumerate() {
            let id = BusinessId(i as u32);
            let building = components
                .get_mut(home.index())
                .ok_or(CoreError::ComponentNotFound(home))?
                .as_building_mut()
                .ok_or(BusinessError::HomeNotBuilding(home))?;
            building.businesses.push(id);
            businesses.push(Business::new(id, home, params));
        }

        Ok(World { components, businesses, by_exposure })
    }
}
