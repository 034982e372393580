//! Building → nearest network node mapping.
//!
//! # CSV format
//!
//! ```csv
//! AIM_id,closest_node
//! 1001,4
//! 1002,9
//! ```
//!
//! Rows whose `closest_node` is not an integral node id are skipped with an
//! [`InvalidNodeId`](br_core::DiagnosticKind::InvalidNodeId) diagnostic.

use std::io::Read;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use br_core::{DiagnosticKind, Diagnostics, ExposureId, NodeId};

use crate::TrafficResult;

#[derive(Deserialize)]
struct NodeMapRecord {
    #[serde(rename = "AIM_id")]
    aim_id:       u32,
    closest_node: String,
}

#[derive(Clone, Debug, Default)]
pub struct NodeMap {
    nodes: FxHashMap<ExposureId, NodeId>,
}

impl NodeMap {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (ExposureId, NodeId)>) -> Self {
        Self { nodes: pairs.into_iter().collect() }
    }

    pub fn get(&self, exposure: ExposureId) -> Option<NodeId> {
        self.nodes.get(&exposure).copied()
    }

    pub fn insert(&mut self, exposure: ExposureId, node: NodeId) {
        self.nodes.insert(exposure, node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Load a [`NodeMap`] from a CSV file.
pub fn load_node_map_csv(path: &Path, diagnostics: &mut Diagnostics) -> TrafficResult<NodeMap> {
    let file = std::fs::File::open(path)?;
    load_node_map_reader(file, diagnostics)
}

/// Like [`load_node_map_csv`] but accepts any `Read` source.
pub fn load_node_map_reader<R: Read>(
    reader:      R,
    diagnostics: &mut Diagnostics,
) -> TrafficResult<NodeMap> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut map = NodeMap::default();
    for record in csv_reader.deserialize() {
        let record: NodeMapRecord = record?;
        match NodeId::parse(&record.closest_node) {
            Some(node) => map.insert(ExposureId(record.aim_id), node),
            None => diagnostics.record(None, DiagnosticKind::InvalidNodeId {
                raw: record.closest_node,
            }),
        }
    }
    Ok(map)
}
