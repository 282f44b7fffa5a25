//! Candidate filtering: which existing records are close enough in time to
//! be scored at all.

use tracing::trace;

use crate::platform::{PlatformRegistry, normalize_source};
use crate::policy::EchoPolicy;
use crate::record::{ExistingRecord, IncomingEvent};

/// Existing records whose dates fall inside the incoming platform's match
/// window. Records from the incoming event's own feed are never candidates.
pub fn find_matching_bookings<'r>(
    event: &IncomingEvent,
    existing: &'r [ExistingRecord],
    registry: &PlatformRegistry,
    policy: &EchoPolicy,
) -> Vec<&'r ExistingRecord> {
    let platform = registry.get(&event.source);
    let shift = platform.known_shift();
    let tolerance = shift.saturating_add(policy.date_tolerance_days);
    let incoming_source = normalize_source(&event.source);
    let incoming = event.stay();

    existing
        .iter()
        .filter(|record| normalize_source(&record.source) != incoming_source)
        .filter(|record| {
            let diffs = incoming.day_diffs(&record.stay());
            let in_window = diffs.within(tolerance)
                || (platform.has_date_corruption
                    && diffs.within_after_shift(shift, policy.corruption_tolerance_days));

            trace!(
                record = %record.id,
                check_in_diff = diffs.check_in,
                check_out_diff = diffs.check_out,
                tolerance,
                in_window,
                "candidate window check"
            );
            in_window
        })
        .collect()
}
