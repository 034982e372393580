//! Per-tick travel-time results and their change relative to the baseline.

use rustc_hash::FxHashMap;

use br_core::{NodeId, TripId};

// ── Travel times ──────────────────────────────────────────────────────────────

/// Simulated travel time of one trip.
#[derive(Clone, Debug, PartialEq)]
pub struct TravelTimeRecord {
    pub trip:             TripId,
    pub origin:           NodeId,
    pub destination:      NodeId,
    pub travel_time_secs: f64,
}

/// One simulator result, indexed by trip id and by node pair.
#[derive(Clone, Debug, Default)]
pub struct TravelTimeTable {
    records: Vec<TravelTimeRecord>,
    by_trip: FxHashMap<TripId, usize>,
    /// First record per directed pair.
    by_pair: FxHashMap<(NodeId, NodeId), usize>,
}

impl TravelTimeTable {
    pub fn new(records: Vec<TravelTimeRecord>) -> Self {
        let mut by_trip = FxHashMap::default();
        let mut by_pair = FxHashMap::default();
        for (i, r) in records.iter().enumerate() {
            by_trip.insert(r.trip, i);
            by_pair.entry((r.origin, r.destination)).or_insert(i);
        }
        Self { records, by_trip, by_pair }
    }

    /// Reject results a simulator should never produce: duplicate trip ids
    /// or travel times that are negative or not finite.
    pub fn validate(&self) -> Result<(), String> {
        if self.by_trip.len() != self.records.len() {
            return Err("duplicate trip ids in travel-time result".into());
        }
        match self
            .records
            .iter()
            .find(|r| !r.travel_time_secs.is_finite() || r.travel_time_secs < 0.0)
        {
            Some(r) => Err(format!("{}: invalid travel time {}", r.trip, r.travel_time_secs)),
            None => Ok(()),
        }
    }

    pub fn get(&self, trip: TripId) -> Option<&TravelTimeRecord> {
        self.by_trip.get(&trip).map(|&i| &self.records[i])
    }

    /// A trip from `a` to `b`, or failing that from `b` to `a`.
    pub fn find_between(&self, a: NodeId, b: NodeId) -> Option<&TravelTimeRecord> {
        self.by_pair
            .get(&(a, b))
            .or_else(|| self.by_pair.get(&(b, a)))
            .map(|&i| &self.records[i])
    }

    pub fn records(&self) -> &[TravelTimeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ── Change factors ────────────────────────────────────────────────────────────

/// Current travel time over baseline travel time for one trip.  `None` when
/// it cannot be computed.
#[derive(Clone, Debug, PartialEq)]
pub struct ChangeFactorRecord {
    pub trip:        TripId,
    pub origin:      NodeId,
    pub destination: NodeId,
    pub factor:      Option<f64>,
}

#[derive(Clone, Debug, Default)]
pub struct ChangeFactorTable {
    records: Vec<ChangeFactorRecord>,
    by_trip: FxHashMap<TripId, usize>,
}

impl ChangeFactorTable {
    /// Divide every trip of `current` by the same trip in `baseline`.
    ///
    /// Trips are matched by id.  The factor is unknown when the trip is
    /// absent from the baseline or its baseline time is not positive; those
    /// trips are returned alongside the table.
    pub fn compute(baseline: &TravelTimeTable, current: &TravelTimeTable) -> (Self, Vec<TripId>) {
        let mut unknown = Vec::new();
        let records: Vec<_> = current
            .records()
            .iter()
            .map(|r| {
                let factor = baseline
                    .get(r.trip)
                    .map(|b| b.travel_time_secs)
                    .filter(|&b| b > 0.0)
                    .map(|b| r.travel_time_secs / b);
                if factor.is_none() {
                    unknown.push(r.trip);
                }
                ChangeFactorRecord {
                    trip:        r.trip,
                    origin:      r.origin,
                    destination: r.destination,
                    factor,
                }
            })
            .collect();
        let by_trip = records.iter().enumerate().map(|(i, r)| (r.trip, i)).collect();
        (Self { records, by_trip }, unknown)
    }

    pub fn get(&self, trip: TripId) -> Option<&ChangeFactorRecord> {
        self.by_trip.get(&trip).map(|&i| &self.records[i])
    }

    /// Trips whose factor is known and at most `cutoff_ratio`.
    pub fn completed_trips(&self, cutoff_ratio: f64) -> usize {
        self.records
            .iter()
            .filter(|r| r.factor.is_some_and(|f| f <= cutoff_ratio))
            .count()
    }

    pub fn records(&self) -> &[ChangeFactorRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
