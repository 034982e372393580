//! `br-core`: foundational types for the business-recovery digital twin.
//!
//! This crate is a dependency of every other `br-*` crate.  It has no `br-*`
//! dependencies and few external ones (`rand`, `thiserror`, `tracing`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                      |
//! |-----------------|---------------------------------------------------------------|
//! | [`ids`]         | `ComponentId`, `BusinessId`, `NodeId`, `ExposureId`, `TripId` |
//! | [`time`]        | `Tick`, `SimClock`, `DistributionSchedule`                    |
//! | [`config`]      | `SimConfig`, `AccessCutoffs`                                  |
//! | [`component`]   | `Component` capability set, `Building`, `ShelterCapacity`     |
//! | [`diagnostics`] | `Diagnostic`, `DiagnosticKind`, `Diagnostics` collector       |
//! | [`rng`]         | `SimRng` (seeded, deterministic)                              |
//! | [`scope`]       | `Scope` of a supply/demand total                              |
//! | [`error`]       | `CoreError`, `CoreResult`                                     |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                      |
//! |---------|-------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to IDs and config types.     |

pub mod component;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod ids;
pub mod rng;
pub mod scope;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use component::{Building, Component, ComponentKind, LinkKind, ShelterCapacity, ZoneId};
pub use config::{AccessCutoffs, SimConfig};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{CoreError, CoreResult};
pub use ids::{BusinessId, ComponentId, ExposureId, NodeId, TripId};
pub use rng::SimRng;
pub use scope::Scope;
pub use time::{DistributionSchedule, SimClock, Tick};
