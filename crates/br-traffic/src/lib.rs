//! `br-traffic`: travel times on a degrading road network.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                              |
//! |---------------|-----------------------------------------------------------------------|
//! | [`trips`]     | `TripRow`, `TripStore`, `CsvTripFile`, `TripRegistry` (OD trip table) |
//! | [`node_map`]  | `NodeMap` (building → nearest node), CSV loader                       |
//! | [`table`]     | `TravelTimeTable`, `ChangeFactorTable`                                |
//! | [`history`]   | `History<T>`: tick-aligned, sparse, hold-last-value series            |
//! | [`network`]   | `NetworkState`: compact component state handed to the simulator       |
//! | [`simulator`] | `TrafficSimulator` trait, `Console`, `ConsoleGuard`, `SimulatorError` |
//! | [`access`]    | `Accessibility`, `check_access`                                       |
//! | [`demand`]    | `NodePopulation`, `adjust_demand` (OD pruning on population change)   |
//! | [`model`]     | `TrafficDistributionModel`, `TravelTimeSource`, `TripWiring`          |
//! | [`error`]     | `TrafficError`, `TrafficResult<T>`                                    |
//!
//! # Per-tick state machine
//!
//! ```text
//! distribute(t):
//!   ungated → push placeholder into both histories
//!   gated   → NetworkState::from_components
//!             ConsoleGuard { simulator.simulate(network, trips) }
//!             travel_times[t]   = result
//!             change_factors[t] = result / travel_times[0]   (matched by trip id)
//! ```
//!
//! The external traffic simulator is a black box behind [`TrafficSimulator`];
//! swap implementations at compile time as with any other generic seam.

pub mod access;
pub mod demand;
pub mod error;
pub mod history;
pub mod model;
pub mod network;
pub mod node_map;
pub mod simulator;
pub mod table;
pub mod trips;


pub use access::{Accessibility, check_access};
pub use demand::{NodePopulation, adjust_demand};
pub use error::{TrafficError, TrafficResult};
pub use history::History;
pub use model::{TrafficDistributionModel, TravelTimeSource, TripWiring};
pub use network::{BuildingState, LinkState, NetworkState};
pub use node_map::{NodeMap, load_node_map_csv, load_node_map_reader};
pub use simulator::{Console, ConsoleGuard, SimulationRequest, SimulatorError, TrafficSimulator};
pub use table::{ChangeFactorRecord, ChangeFactorTable, TravelTimeRecord, TravelTimeTable};
pub use trips::{
    CONSTANT_CATEGORY, CsvTripFile, MemoryTripStore, SYNTHETIC_TRIP_ID_BASE, TripRegistry,
    TripRow, TripStore,
};
