//! Infrastructure components and their capabilities.
//!
//! Distribution models never branch on a type hierarchy; they ask a
//! component what it can do:
//!
//! | Query                  | True / `Some` for                               |
//! |------------------------|-------------------------------------------------|
//! | `has_businesses()`     | buildings hosting at least one business         |
//! | `shelter()`            | buildings with a shelter (population) capacity  |
//! | `is_network_link()`    | bridges, roadways, tunnels                      |
//! | `as_building()`        | any building                                    |
//!
//! A building owns the list of its businesses by `BusinessId`; each business
//! refers back to its home building by `ComponentId`.

use std::fmt;

use crate::{BusinessId, ComponentId, ExposureId};

// ── ZoneId ────────────────────────────────────────────────────────────────────

/// Population zone (census block group) identifier.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ZoneId(pub String);

impl ZoneId {
    pub fn new(id: impl Into<String>) -> Self {
        ZoneId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Capabilities ──────────────────────────────────────────────────────────────

/// Initial and current amount of the "shelter" resource a building supplies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShelterCapacity {
    pub initial: f64,
    pub current: f64,
}

impl ShelterCapacity {
    pub fn new(initial: f64) -> Self {
        Self { initial, current: initial }
    }
}

/// Building-specific state.
#[derive(Clone, Debug)]
pub struct Building {
    /// Identifier in the exposure dataset; key of the building-to-node map.
    pub exposure_id: ExposureId,
    /// Population zone the building belongs to.
    pub zone:        ZoneId,
    /// Pre-event resident population.
    pub population:  f64,
    /// `None` for buildings that provide no shelter (offices, warehouses).
    pub shelter:     Option<ShelterCapacity>,
    /// Businesses hosted by this building.
    pub businesses:  Vec<BusinessId>,
}

/// Kind of network link the traffic simulator sees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinkKind {
    Bridge,
    Roadway,
    Tunnel,
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LinkKind::Bridge  => "bridge",
            LinkKind::Roadway => "roadway",
            LinkKind::Tunnel  => "tunnel",
        })
    }
}

#[derive(Clone, Debug)]
pub enum ComponentKind {
    Building(Building),
    Link(LinkKind),
    /// Water/wastewater pipe.  Has no role in the business engine beyond
    /// carrying a functionality level.
    Pipe,
}

// ── Component ─────────────────────────────────────────────────────────────────

/// One infrastructure component with its current functionality.
#[derive(Clone, Debug)]
pub struct Component {
    pub id:            ComponentId,
    pub name:          String,
    pub kind:          ComponentKind,
    /// Operating level in `[0, 1]`.
    pub functionality: f64,
    /// Share of the component's infrastructure demand met this tick, in
    /// `[0, 1]`.  Set by the recovery hook; 1.0 when unconstrained.
    pub met_demand:    f64,
}

impl Component {
    pub fn new(id: ComponentId, name: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            functionality: 1.0,
            met_demand:    1.0,
        }
    }

    pub fn as_building(&self) -> Option<&Building> {
        match &self.kind {
            ComponentKind::Building(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_building_mut(&mut self) -> Option<&mut Building> {
        match &mut self.kind {
            ComponentKind::Building(b) => Some(b),
            _ => None,
        }
    }

    /// Businesses hosted here; empty for anything that is not a building.
    pub fn businesses(&self) -> &[BusinessId] {
        self.as_building().map(|b| b.businesses.as_slice()).unwrap_or(&[])
    }

    #[inline]
    pub fn has_businesses(&self) -> bool {
        !self.businesses().is_empty()
    }

    pub fn shelter(&self) -> Option<&ShelterCapacity> {
        self.as_building().and_then(|b| b.shelter.as_ref())
    }

    pub fn shelter_mut(&mut self) -> Option<&mut ShelterCapacity> {
        self.as_building_mut().and_then(|b| b.shelter.as_mut())
    }

    pub fn link_kind(&self) -> Option<LinkKind> {
        match self.kind {
            ComponentKind::Link(kind) => Some(kind),
            _ => None,
        }
    }

    #[inline]
    pub fn is_network_link(&self) -> bool {
        self.link_kind().is_some()
    }

    pub fn exposure_id(&self) -> Option<ExposureId> {
        self.as_building().map(|b| b.exposure_id)
    }

    /// Fraction of the pre-event population present in the building.
    /// Buildings lose occupants in proportion to lost functionality.
    pub fn population_ratio(&self) -> Option<f64> {
        self.as_building().map(|_| self.functionality)
    }

    /// `true` when the component is fully operational.
    #[inline]
    pub fn is_fully_functional(&self) -> bool {
        self.functionality >= 1.0
    }
}
