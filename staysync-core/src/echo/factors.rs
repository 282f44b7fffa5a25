//! The five independent scoring factors.
//!
//! Each factor looks at one aspect of an (incoming, existing) pair and
//! returns a score in [0, 1] with a human-readable reason. The analyzer
//! weights and sums them.

use std::time::Duration as StdDuration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::constants::{CLOSE_DATE_DIFF_DAYS, LOOSE_DATE_DIFF_DAYS};
use crate::platform::{PlatformConfig, ReExports};
use crate::policy::EchoPolicy;
use crate::record::{ExistingRecord, RecordKind};
use crate::stay::Stay;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorScore {
    pub score: f64,
    pub reason: String,
}

impl FactorScore {
    fn new(score: f64, reason: impl Into<String>) -> Self {
        FactorScore {
            score,
            reason: reason.into(),
        }
    }
}

/// How closely the dates line up, allowing for a platform's known shift.
pub fn date_match(
    incoming: &Stay,
    existing: &Stay,
    platform: &PlatformConfig,
    policy: &EchoPolicy,
) -> FactorScore {
    let diffs = incoming.day_diffs(existing);
    let shift = platform.known_shift();

    if diffs.is_exact() {
        return FactorScore::new(1.0, "exact date match");
    }

    if shift != 0 && diffs.within_after_shift(shift, policy.shift_match_tolerance_days) {
        return FactorScore::new(
            0.95,
            format!(
                "dates match after correcting {}'s known {}-day shift",
                platform.display_name, shift
            ),
        );
    }

    let total = diffs.total();
    if total <= CLOSE_DATE_DIFF_DAYS {
        FactorScore::new(0.9, format!("dates within {total} day(s)"))
    } else if total <= LOOSE_DATE_DIFF_DAYS {
        FactorScore::new(0.7, format!("dates within {total} days"))
    } else {
        FactorScore::new(0.0, format!("dates differ by {total} days"))
    }
}

/// Length of stay. Survives a platform shifting both dates together.
pub fn duration_match(incoming: &Stay, existing: &Stay) -> FactorScore {
    let incoming_nights = incoming.nights();
    let existing_nights = existing.nights();

    match (incoming_nights - existing_nights).abs() {
        0 => FactorScore::new(1.0, format!("same duration ({incoming_nights} nights)")),
        1 => FactorScore::new(
            0.7,
            format!("duration off by one night ({incoming_nights} vs {existing_nights})"),
        ),
        _ => FactorScore::new(
            0.0,
            format!("different duration ({incoming_nights} vs {existing_nights} nights)"),
        ),
    }
}

/// Whether the existing record is plausibly something we exported to the
/// incoming platform. Inferred from the record kind and the platform's
/// re-export profile; exports are not tracked individually.
pub fn export_correlation(existing: &ExistingRecord, platform: &PlatformConfig) -> FactorScore {
    match (existing.kind, platform.re_exports) {
        (RecordKind::Booking, ReExports::Yes) => FactorScore::new(
            1.0,
            format!("native booking was exported to {}", platform.display_name),
        ),
        (RecordKind::Booking, _) if platform.is_aggregator() => FactorScore::new(
            0.8,
            format!(
                "native booking likely exported to aggregator {}",
                platform.display_name
            ),
        ),
        (RecordKind::IcalEvent, ReExports::Yes) => FactorScore::new(
            0.9,
            format!(
                "cross-platform echo chain: {} event re-exported by {}",
                existing.source, platform.display_name
            ),
        ),
        _ => FactorScore::new(0.5, "export correlation unclear"),
    }
}

/// Re-export behavior of the incoming platform against the existing source.
///
/// Two authoritative platforms never echo each other, so a close match
/// between them is a real overbooking and scores zero here.
pub fn platform_profile(incoming: &PlatformConfig, existing: &PlatformConfig) -> FactorScore {
    if incoming.is_aggregator()
        && incoming.re_exports == ReExports::Yes
        && existing.is_authoritative()
    {
        FactorScore::new(
            1.0,
            format!(
                "{} re-exports imported bookings from {}",
                incoming.display_name, existing.display_name
            ),
        )
    } else if incoming.is_aggregator() && incoming.re_exports == ReExports::Unknown {
        FactorScore::new(
            0.7,
            format!("{} is an aggregator with unknown re-export behavior", incoming.display_name),
        )
    } else if incoming.is_authoritative() && existing.is_authoritative() {
        FactorScore::new(
            0.0,
            format!(
                "{} and {} are both authoritative: possible real overbooking",
                incoming.display_name, existing.display_name
            ),
        )
    } else {
        FactorScore::new(0.5, "platform relationship inconclusive")
    }
}

/// Gap between the two imports. A near-simultaneous pair looks like a race
/// between two genuine bookings; a gap of hours looks like a re-sync.
pub fn temporal(
    incoming_at: DateTime<Utc>,
    existing_at: DateTime<Utc>,
    policy: &EchoPolicy,
) -> FactorScore {
    let gap_seconds = (incoming_at - existing_at).num_seconds().unsigned_abs();
    let gap_minutes = gap_seconds as f64 / 60.0;
    let gap = humantime::format_duration(StdDuration::from_secs(gap_seconds));

    let race = policy.race_window_minutes as f64;
    let resync = policy.resync_delay_minutes as f64;

    if gap_minutes <= race {
        FactorScore::new(0.0, format!("imported {gap} apart: consistent with a booking race"))
    } else if gap_minutes >= resync {
        FactorScore::new(1.0, format!("imported {gap} apart: consistent with a re-sync delay"))
    } else {
        let score = (gap_minutes - race) / (resync - race);
        FactorScore::new(score, format!("imported {gap} apart"))
    }
}
