//! A toy traffic simulator for the island scenario.
//!
//! The island (nodes below 100) is joined to the mainland by a single
//! bridge.  Trips that stay on one side take a fixed time; trips that cross
//! take longer as more of them share the bridge, and fall back to a ferry
//! detour while the bridge is below half functionality.

use std::io::Write;

use br_core::NodeId;
use br_traffic::{Console, SimulationRequest, SimulatorError, TrafficSimulator, TravelTimeRecord};

const LOCAL_SECS:       f64 = 900.0;
const BRIDGE_SECS:      f64 = 1_800.0;
/// Added per crossing trip, for congestion.
const BRIDGE_LOAD_SECS: f64 = 30.0;
const FERRY_SECS:       f64 = 10_800.0;

fn on_island(node: NodeId) -> bool {
    node.0 < 100
}

#[derive(Default)]
pub struct IslandSimulator {
    console: Console,
}

impl TrafficSimulator for IslandSimulator {
    fn simulate(
        &mut self,
        request: &SimulationRequest<'_>,
    ) -> Result<Vec<TravelTimeRecord>, SimulatorError> {
        let bridge = request.network.link_functionality("bridge").ok_or_else(|| {
            SimulatorError::Malformed("network has no link named \"bridge\"".into())
        })?;
        let crossing = request
            .trips
            .iter()
            .filter(|t| on_island(t.origin_nid) != on_island(t.destin_nid))
            .count();
        writeln!(
            self.console,
            "tick {}: {} trips, {crossing} crossing, bridge at {bridge:.2}",
            request.tick,
            request.trips.len(),
        )?;

        let crossing_secs = if bridge < 0.5 {
            FERRY_SECS
        } else {
            BRIDGE_SECS / bridge + BRIDGE_LOAD_SECS * crossing as f64
        };
        Ok(request
            .trips
            .iter()
            .map(|t| TravelTimeRecord {
                trip:             t.agent_id,
                origin:           t.origin_nid,
                destination:      t.destin_nid,
                travel_time_secs: if on_island(t.origin_nid) == on_island(t.destin_nid) {
                    LOCAL_SECS
                } else {
                    crossing_secs
                },
            })
            .collect())
    }

    fn redirect_console(&mut self, out: Box<dyn Write + Send>) -> Box<dyn Write + Send> {
        self.console.replace(out)
    }
}
