//! OD demand adjustment after population change.
//!
//! Trips starting or ending at a node whose population changed are
//! subsampled in proportion to the change: a node at 60 % of its pre-event
//! population keeps `floor(0.6 × n)` of its `n` outgoing trips and the same
//! share of its incoming ones.  A trip survives if either of its endpoints
//! keeps it.  Trips in a constant category, and trips the caller marks as
//! protected, always survive.  Population
//! cannot grow at a node that had none, since no trips exist to scale; that
//! case is reported and the node's trips are dropped.

use std::collections::{BTreeMap, BTreeSet};

use br_core::{DiagnosticKind, Diagnostics, NodeId, SimRng, Tick};

use crate::{NetworkState, TripRow};

/// Resident population per network node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodePopulation(BTreeMap<NodeId, f64>);

impl NodePopulation {
    /// Sum the current population of every mapped building by node.
    pub fn from_network(network: &NetworkState) -> Self {
        let mut by_node = BTreeMap::new();
        for b in &network.buildings {
            if let Some(node) = b.node {
                *by_node.entry(node).or_insert(0.0) += b.current_population();
            }
        }
        Self(by_node)
    }

    /// Population at `node`; 0 for nodes with no buildings.
    pub fn get(&self, node: NodeId) -> f64 {
        self.0.get(&node).copied().unwrap_or(0.0)
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.0.keys().copied()
    }
}

/// Subsample `trips` for the population change from `baseline` to
/// `current`.  Output keeps the input order.
#[allow(clippy::too_many_arguments)]
pub fn adjust_demand(
    trips:               &[TripRow],
    baseline:            &NodePopulation,
    current:             &NodePopulation,
    constant_categories: &[String],
    is_protected:        impl Fn(&TripRow) -> bool,
    rng:                 &mut SimRng,
    tick:                Tick,
    diagnostics:         &mut Diagnostics,
) -> Vec<TripRow> {
    let mut starting: BTreeMap<NodeId, Vec<usize>> = BTreeMap::new();
    let mut ending: BTreeMap<NodeId, Vec<usize>> = BTreeMap::new();
    for (i, t) in trips.iter().enumerate() {
        starting.entry(t.origin_nid).or_default().push(i);
        ending.entry(t.destin_nid).or_default().push(i);
    }

    let nodes: BTreeSet<NodeId> = baseline
        .nodes()
        .chain(current.nodes())
        .chain(starting.keys().copied())
        .chain(ending.keys().copied())
        .collect();

    let mut keep = vec![false; trips.len()];
    for node in nodes {
        let before = baseline.get(node);
        let change = current.get(node) - before;
        let at_start = starting.get(&node).map(Vec::as_slice).unwrap_or(&[]);
        let at_end = ending.get(&node).map(Vec::as_slice).unwrap_or(&[]);

        if change == 0.0 {
            for &i in at_start.iter().chain(at_end) {
                keep[i] = true;
            }
        } else if before == 0.0 {
            diagnostics.record(Some(tick), DiagnosticKind::NewPopulationAtEmptyNode { node });
        } else {
            let scale = 1.0 + change / before;
            for list in [at_start, at_end] {
                let amount = (list.len() as f64 * scale).max(0.0).floor() as usize;
                for picked in rng.sample_indices(list.len(), amount) {
                    keep[list[picked]] = true;
                }
            }
        }
    }

    trips
        .iter()
        .zip(keep)
        .filter(|(t, kept)| {
            *kept
                || constant_categories.iter().any(|c| *c == t.tour_category)
                || is_protected(t)
        })
        .map(|(t, _)| t.clone())
        .collect()
}
