//! Operator-facing, non-fatal data-quality signals.
//!
//! Conditions such as a missing trip or an unmapped building do not abort a
//! timestep; the affected lookup falls back to its documented value and a
//! [`Diagnostic`] is recorded.  Every record is also emitted through
//! `tracing::warn!` so it reaches whatever subscriber the application
//! installed.

use std::fmt;

use crate::{BusinessId, ExposureId, NodeId, Tick, TripId, ZoneId};

/// What went wrong.
#[derive(Clone, Debug, PartialEq)]
pub enum DiagnosticKind {
    /// No trip between two nodes in the travel-time table (either direction).
    MissingTrip { origin: NodeId, destination: NodeId },
    /// A trip's change factor could not be computed (absent from the current
    /// or the baseline result, or zero baseline travel time).
    UnknownChangeFactor { trip: TripId },
    /// A building has no entry in the building-to-node mapping.
    UnmappedBuilding { exposure: ExposureId },
    /// A node id in an external table is not a valid network node id.
    InvalidNodeId { raw: String },
    /// A customer zone has no population record.
    MissingZone { business: BusinessId, zone: ZoneId },
    /// Population appeared at a node whose pre-event population was zero.
    NewPopulationAtEmptyNode { node: NodeId },
    /// An employee home location is not a known building.
    UnknownEmployeeHome { business: BusinessId, exposure: ExposureId },
    /// A supplier location is not a known building.
    UnknownSupplier { business: BusinessId, exposure: ExposureId },
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTrip { origin, destination } => {
                write!(f, "no trip between {origin} and {destination}")
            }
            Self::UnknownChangeFactor { trip } => {
                write!(f, "travel-time change factor unknown for {trip}")
            }
            Self::UnmappedBuilding { exposure } => {
                write!(f, "{exposure} has no nearest network node")
            }
            Self::InvalidNodeId { raw } => write!(f, "invalid node id {raw:?}"),
            Self::MissingZone { business, zone } => {
                write!(f, "{business}: customer zone {zone} has no population record")
            }
            Self::NewPopulationAtEmptyNode { node } => {
                write!(f, "new population at {node}, which had zero pre-event population")
            }
            Self::UnknownEmployeeHome { business, exposure } => {
                write!(f, "{business}: employee home {exposure} is not a known building")
            }
            Self::UnknownSupplier { business, exposure } => {
                write!(f, "{business}: supplier {exposure} is not a known building")
            }
        }
    }
}

/// One recorded diagnostic.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    /// Tick at which the condition was observed (`None` during wiring).
    pub tick:   Option<Tick>,
    /// Name of the model or loader that observed it.
    pub source: String,
    pub kind:   DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tick {
            Some(t) => write!(f, "[{} {}] {}", self.source, t, self.kind),
            None    => write!(f, "[{}] {}", self.source, self.kind),
        }
    }
}

/// Append-only collector owned by one model.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    source:  String,
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(source: impl Into<String>) -> Self {
        Self { source: source.into(), records: Vec::new() }
    }

    /// Record and log one diagnostic.
    pub fn record(&mut self, tick: Option<Tick>, kind: DiagnosticKind) {
        let diagnostic = Diagnostic { tick, source: self.source.clone(), kind };
        tracing::warn!(target: "br::diagnostics", "{diagnostic}");
        self.records.push(diagnostic);
    }

    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    /// Records observed at `tick`.
    pub fn at(&self, tick: Tick) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter().filter(move |d| d.tick == Some(tick))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Move another collector's records into this one (keeps their source).
    pub fn absorb(&mut self, other: Diagnostics) {
        self.records.extend(other.records);
    }
}
