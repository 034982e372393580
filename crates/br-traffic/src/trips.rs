//! The OD trip table and its persistent store.
//!
//! # CSV format
//!
//! One row per trip.  `origin_nid`/`destin_nid` are network node ids.
//!
//! ```csv
//! agent_id,origin_nid,destin_nid,hour,quarter,tour_category,person_id
//! 1,4,9,7,2,WORK,101
//! 2,9,4,17,1,WORK,101
//! ```
//!
//! Trips added while wiring businesses to their employees and suppliers are
//! appended to the same file immediately, with `tour_category = CONSTANT`,
//! so a restart sees them.  The file is only ever appended to.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use br_core::{NodeId, TripId};

use crate::{TrafficError, TrafficResult};

/// Category of trips that never change under population change.
pub const CONSTANT_CATEGORY: &str = "CONSTANT";

/// Agent ids below this are reserved for the input trip table.
pub const SYNTHETIC_TRIP_ID_BASE: u64 = 1_000_000_000_000;

// ── TripRow ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TripRow {
    pub agent_id:      TripId,
    pub origin_nid:    NodeId,
    pub destin_nid:    NodeId,
    pub hour:          u8,
    pub quarter:       u8,
    pub tour_category: String,
    pub person_id:     u64,
}

impl TripRow {
    pub fn is_constant(&self) -> bool {
        self.tour_category == CONSTANT_CATEGORY
    }
}

// ── TripStore ─────────────────────────────────────────────────────────────────

/// Backing storage of the OD trip table.
pub trait TripStore: Send {
    /// Read every row, in file order.
    fn load(&mut self) -> TrafficResult<Vec<TripRow>>;

    /// Durably append one row.
    fn append(&mut self, row: &TripRow) -> TrafficResult<()>;
}

/// OD trip table kept in a CSV file.
pub struct CsvTripFile {
    path: PathBuf,
}

impl CsvTripFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TripStore for CsvTripFile {
    fn load(&mut self) -> TrafficResult<Vec<TripRow>> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut rows = Vec::new();
        for row in reader.deserialize() {
            rows.push(row?);
        }
        Ok(rows)
    }

    fn append(&mut self, row: &TripRow) -> TrafficResult<()> {
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let is_empty = file.metadata()?.len() == 0;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_empty)
            .from_writer(file);
        writer.serialize(row)?;
        writer.flush()?;
        Ok(())
    }
}

/// In-memory store for runs that need no persistence.
#[derive(Default)]
pub struct MemoryTripStore {
    rows: Vec<TripRow>,
}

impl MemoryTripStore {
    pub fn new(rows: Vec<TripRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[TripRow] {
        &self.rows
    }
}

impl TripStore for MemoryTripStore {
    fn load(&mut self) -> TrafficResult<Vec<TripRow>> {
        Ok(self.rows.clone())
    }

    fn append(&mut self, row: &TripRow) -> TrafficResult<()> {
        self.rows.push(row.clone());
        Ok(())
    }
}

// ── TripRegistry ──────────────────────────────────────────────────────────────

/// The OD trip table plus a bidirectional node-pair index.
///
/// Agent ids are unique.  Rows are never removed, so once `exists(a, b)`
/// holds it holds for the rest of the run.
///
/// Every pair passed to [`ensure_trip`](Self::ensure_trip) is protected,
/// whether its trip was added or already present: demand adjustment never
/// drops a protected pair's trips.
pub struct TripRegistry {
    store:          Box<dyn TripStore>,
    rows:           Vec<TripRow>,
    pairs:          FxHashSet<(NodeId, NodeId)>,
    protected:      FxHashSet<(NodeId, NodeId)>,
    next_synthetic: u64,
}

impl TripRegistry {
    /// Load the trip table from `store` and index it.
    ///
    /// # Errors
    ///
    /// Store I/O failures and [`TrafficError::DuplicateTrip`].
    pub fn open(mut store: Box<dyn TripStore>) -> TrafficResult<Self> {
        let rows = store.load()?;

        let mut ids = FxHashSet::default();
        let mut pairs = FxHashSet::default();
        let mut max_id = None;
        for row in &rows {
            if !ids.insert(row.agent_id) {
                return Err(TrafficError::DuplicateTrip(row.agent_id));
            }
            pairs.insert((row.origin_nid, row.destin_nid));
            max_id = max_id.max(Some(row.agent_id.0));
        }
        let next_synthetic = max_id.map_or(SYNTHETIC_TRIP_ID_BASE, |m| {
            SYNTHETIC_TRIP_ID_BASE.max(m + 1)
        });

        tracing::debug!(trips = rows.len(), "OD trip table loaded");
        Ok(Self { store, rows, pairs, protected: FxHashSet::default(), next_synthetic })
    }

    /// Convenience: a registry over a [`CsvTripFile`].
    pub fn open_csv(path: impl Into<PathBuf>) -> TrafficResult<Self> {
        Self::open(Box::new(CsvTripFile::new(path)))
    }

    /// `true` if a trip from `a` to `b` or from `b` to `a` exists.
    pub fn exists(&self, a: NodeId, b: NodeId) -> bool {
        self.pairs.contains(&(a, b)) || self.pairs.contains(&(b, a))
    }

    /// Ensure a trip between `origin` and `destination` exists.
    ///
    /// Returns the id of the trip added, or `None` if one already existed in
    /// either direction.  The new row reaches the store before the in-memory
    /// table, so a failed append leaves the registry unchanged.
    pub fn ensure_trip(
        &mut self,
        origin:      NodeId,
        destination: NodeId,
        category:    &str,
    ) -> TrafficResult<Option<TripId>> {
        if self.exists(origin, destination) {
            self.protected.insert((origin, destination));
            return Ok(None);
        }
        let id = TripId(self.next_synthetic);
        let row = TripRow {
            agent_id:      id,
            origin_nid:    origin,
            destin_nid:    destination,
            hour:          0,
            quarter:       0,
            tour_category: category.to_owned(),
            person_id:     id.0,
        };
        self.store.append(&row)?;

        self.next_synthetic += 1;
        self.pairs.insert((origin, destination));
        self.protected.insert((origin, destination));
        self.rows.push(row);
        tracing::trace!(%origin, %destination, %id, "trip added");
        Ok(Some(id))
    }

    /// `true` if a trip between `a` and `b`, in either direction, was
    /// requested through [`ensure_trip`](Self::ensure_trip).
    pub fn is_protected(&self, a: NodeId, b: NodeId) -> bool {
        self.protected.contains(&(a, b)) || self.protected.contains(&(b, a))
    }

    pub fn rows(&self) -> &[TripRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
