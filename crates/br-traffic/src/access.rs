//! The accessibility verdict shared by the labor and commodity models.

use br_core::{AccessCutoffs, NodeId, TripId};

use crate::{ChangeFactorTable, TravelTimeTable};

/// Outcome of one accessibility check.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Accessibility {
    Accessible,
    /// Both the travel time and its change factor exceed their cutoffs.
    Inaccessible,
    /// No trip between the two nodes in either direction.
    NoTrip,
    /// No travel-time table is available at or before the queried tick.
    NoData,
    /// The trip is slower than the time cutoff and its change factor is
    /// unknown.
    UnknownChange(TripId),
}

impl Accessibility {
    #[inline]
    pub fn is_accessible(self) -> bool {
        self == Accessibility::Accessible
    }
}

/// Inaccessible only when `travel time > cutoff` AND `change factor > ratio`.
pub fn check_access(
    travel_times:   &TravelTimeTable,
    change_factors: &ChangeFactorTable,
    from:           NodeId,
    to:             NodeId,
    cutoffs:        &AccessCutoffs,
) -> Accessibility {
    let Some(trip) = travel_times.find_between(from, to) else {
        return Accessibility::NoTrip;
    };
    if trip.travel_time_secs <= cutoffs.travel_time_secs {
        return Accessibility::Accessible;
    }
    match change_factors.get(trip.trip).and_then(|r| r.factor) {
        Some(f) if f > cutoffs.change_ratio => Accessibility::Inaccessible,
        Some(_) => Accessibility::Accessible,
        None => Accessibility::UnknownChange(trip.trip),
    }
}
