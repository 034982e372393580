//! The compact network description handed to the traffic simulator.

use br_core::{Component, ComponentId, ExposureId, LinkKind, NodeId, Tick};

use crate::NodeMap;

#[derive(Clone, Debug, PartialEq)]
pub struct BuildingState {
    pub exposure_id:      ExposureId,
    /// `None` when the building is not in the node map.
    pub node:             Option<NodeId>,
    /// Pre-event resident population.
    pub population:       f64,
    /// Fraction of `population` still present.
    pub population_ratio: f64,
}

impl BuildingState {
    pub fn current_population(&self) -> f64 {
        self.population * self.population_ratio
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinkState {
    pub component:     ComponentId,
    pub name:          String,
    pub kind:          LinkKind,
    pub functionality: f64,
}

/// Building population and link functionality at one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NetworkState {
    pub tick:      Tick,
    pub buildings: Vec<BuildingState>,
    pub links:     Vec<LinkState>,
}

impl NetworkState {
    /// Snapshot every building and network link in `components`.
    pub fn from_components(tick: Tick, components: &[Component], node_map: &NodeMap) -> Self {
        let mut buildings = Vec::new();
        let mut links = Vec::new();
        for c in components {
            if let Some(b) = c.as_building() {
                buildings.push(BuildingState {
                    exposure_id:      b.exposure_id,
                    node:             node_map.get(b.exposure_id),
                    population:       b.population,
                    population_ratio: c.population_ratio().unwrap_or(1.0),
                });
            } else if let Some(kind) = c.link_kind() {
                links.push(LinkState {
                    component:     c.id,
                    name:          c.name.clone(),
                    kind,
                    functionality: c.functionality,
                });
            }
        }
        Self { tick, buildings, links }
    }

    /// Functionality of the link named `name`.
    pub fn link_functionality(&self, name: &str) -> Option<f64> {
        self.links.iter().find(|l| l.name == name).map(|l| l.functionality)
    }
}
