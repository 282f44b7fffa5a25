//! Merged-echo detection.
//!
//! Some aggregators collapse several adjacent bookings into one long
//! calendar entry on re-export. Such an entry matches none of the originals
//! 1:1, but every one of its nights is already blocked.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::debug;

use crate::platform::normalize_source;
use crate::policy::EchoPolicy;
use crate::record::{ExistingRecord, IncomingEvent};

#[derive(Debug, Clone, PartialEq)]
pub struct Containment {
    pub total_nights: usize,
    pub covered_nights: usize,
    /// Covered share of the incoming event's nights
    pub ratio: f64,
    /// The covering records tile the event exactly: none spills outside it
    /// and no two share a night
    pub exact_union: bool,
    /// Records overlapping the incoming event, in check-in order
    pub covering_ids: Vec<String>,
    pub covering_booking_id: Option<String>,
    pub covering_event_id: Option<String>,
}

impl Containment {
    pub fn is_fully_covered(&self) -> bool {
        self.total_nights > 0 && self.covered_nights == self.total_nights
    }

    /// Confidence that the incoming event is a merged echo, if it is one.
    pub fn confidence(&self, policy: &EchoPolicy) -> Option<f64> {
        let c = &policy.containment;
        if self.is_fully_covered() && self.exact_union {
            Some(c.exact_union)
        } else if self.is_fully_covered() {
            Some(c.overlapping_union)
        } else if self.total_nights > 0 && self.ratio >= c.near_full_ratio {
            Some(c.near_full)
        } else {
            None
        }
    }

    pub fn reason(&self) -> String {
        let records = self.covering_ids.len();
        let bookings = if records == 1 { "booking" } else { "bookings" };
        if self.is_fully_covered() && self.exact_union {
            format!(
                "merged echo: all {} nights already blocked, exact union of {records} {bookings}",
                self.total_nights
            )
        } else if self.is_fully_covered() {
            format!(
                "merged echo: all {} nights already blocked by {records} overlapping {bookings}",
                self.total_nights
            )
        } else {
            format!(
                "probable merged echo: {} of {} nights already blocked ({:.0}%)",
                self.covered_nights,
                self.total_nights,
                self.ratio * 100.0
            )
        }
    }
}

/// Measure how much of the incoming event is already blocked by existing
/// records from other feeds.
pub fn analyze_containment(event: &IncomingEvent, existing: &[ExistingRecord]) -> Containment {
    let incoming = event.stay();
    let nights = incoming.night_dates();
    let incoming_source = normalize_source(&event.source);

    let mut covering: Vec<&ExistingRecord> = existing
        .iter()
        .filter(|record| normalize_source(&record.source) != incoming_source)
        .filter(|record| incoming.overlaps(&record.stay()))
        .collect();
    covering.sort_by_key(|record| (record.check_in, record.check_out));

    let mut blocked: BTreeSet<NaiveDate> = BTreeSet::new();
    let mut sum_of_nights = 0;
    for record in &covering {
        let record_nights = record.stay().night_dates();
        sum_of_nights += record_nights.len();
        blocked.extend(record_nights);
    }

    let covered_nights = nights.intersection(&blocked).count();
    let ratio = if nights.is_empty() {
        0.0
    } else {
        covered_nights as f64 / nights.len() as f64
    };

    let exact_union = !covering.is_empty()
        && covering.iter().all(|record| incoming.contains(&record.stay()))
        && sum_of_nights == blocked.len();

    debug!(
        event = %event.label(),
        nights = nights.len(),
        covered_nights,
        covering = covering.len(),
        exact_union,
        "containment analysis"
    );

    Containment {
        total_nights: nights.len(),
        covered_nights,
        ratio,
        exact_union,
        covering_ids: covering.iter().map(|r| r.id.clone()).collect(),
        covering_booking_id: covering.iter().find(|r| r.is_booking()).map(|r| r.id.clone()),
        covering_event_id: covering.iter().find(|r| !r.is_booking()).map(|r| r.id.clone()),
    }
}
