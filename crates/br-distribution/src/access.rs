use br_core::{DiagnosticKind, Diagnostics, NodeId};
use br_traffic::Accessibility;

use crate::DistributionContext;

/// Accessibility verdict as a bool, recording missing trips and unknown
/// change factors.
pub(crate) fn reachable(
    ctx:         &DistributionContext<'_>,
    from:        NodeId,
    to:          NodeId,
    diagnostics: &mut Diagnostics,
) -> bool {
    match ctx.traffic.accessibility(ctx.tick, from, to, &ctx.cutoffs) {
        Accessibility::Accessible => true,
        Accessibility::NoTrip => {
            diagnostics.record(
                Some(ctx.tick),
                DiagnosticKind::MissingTrip { origin: from, destination: to },
            );
            false
        }
        Accessibility::UnknownChange(trip) => {
            diagnostics.record(Some(ctx.tick), DiagnosticKind::UnknownChangeFactor { trip });
            false
        }
        Accessibility::NoData => {
            tracing::debug!(tick = %ctx.tick, "no travel times yet");
            false
        }
        Accessibility::Inaccessible => false,
    }
}
