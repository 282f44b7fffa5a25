//! The echo analyzer: filters candidates, scores them, checks for merged
//! echoes and classifies the best result.

use serde::Serialize;
use tracing::{debug, info};

use crate::echo::containment::analyze_containment;
use crate::echo::factors::{self, FactorScore};
use crate::echo::matching::find_matching_bookings;
use crate::echo::result::{EchoMatchResult, round_confidence};
use crate::platform::{PlatformRegistry, builtin_registry};
use crate::policy::EchoPolicy;
use crate::record::{ExistingRecord, IncomingEvent, RecordKind};

/// Factor-by-factor scoring of one candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchAnalysis {
    pub record_id: String,
    pub record_kind: RecordKind,
    pub date: FactorScore,
    pub duration: FactorScore,
    pub export: FactorScore,
    pub platform: FactorScore,
    pub temporal: FactorScore,
    /// Weighted sum, capped at 1
    pub confidence: f64,
}

impl MatchAnalysis {
    /// Factor reasons in scoring order.
    pub fn reasons(&self) -> Vec<String> {
        [
            &self.date,
            &self.duration,
            &self.export,
            &self.platform,
            &self.temporal,
        ]
        .into_iter()
        .map(|factor| factor.reason.clone())
        .collect()
    }
}

/// Classifies incoming calendar events against the records already known
/// for a unit.
///
/// Stateless apart from its configuration; one analyzer can be shared
/// across threads.
#[derive(Debug, Clone)]
pub struct EchoAnalyzer<'a> {
    registry: &'a PlatformRegistry,
    policy: EchoPolicy,
}

impl Default for EchoAnalyzer<'static> {
    fn default() -> Self {
        EchoAnalyzer::new(builtin_registry(), EchoPolicy::default())
    }
}

impl<'a> EchoAnalyzer<'a> {
    pub fn new(registry: &'a PlatformRegistry, policy: EchoPolicy) -> Self {
        EchoAnalyzer { registry, policy }
    }

    pub fn policy(&self) -> &EchoPolicy {
        &self.policy
    }

    pub fn registry(&self) -> &PlatformRegistry {
        self.registry
    }

    /// Decide whether `event` is an echo of one of `existing`.
    pub fn analyze_event(&self, event: &IncomingEvent, existing: &[ExistingRecord]) -> EchoMatchResult {
        let platform = self.registry.get(&event.source);

        if platform.is_authoritative() {
            debug!(source = %event.source, "authoritative source, skipping echo analysis");
            return EchoMatchResult::unique("authoritative source cannot be echo");
        }

        let candidates = self.find_matching_bookings(event, existing);

        let mut best: Option<MatchAnalysis> = None;
        for record in candidates {
            let analysis = self.analyze_match(event, record);
            debug!(
                event = %event.label(),
                record = %analysis.record_id,
                confidence = analysis.confidence,
                "scored candidate"
            );
            if best
                .as_ref()
                .is_none_or(|b| analysis.confidence > b.confidence)
            {
                best = Some(analysis);
            }
        }

        let mut result = best.as_ref().map(|analysis| {
            let mut result =
                EchoMatchResult::decided(analysis.confidence, analysis.reasons(), &self.policy);
            match analysis.record_kind {
                RecordKind::Booking => result.matched_booking_id = Some(analysis.record_id.clone()),
                RecordKind::IcalEvent => result.matched_event_id = Some(analysis.record_id.clone()),
            }
            result
        });

        let best_confidence = best.as_ref().map_or(0.0, |b| b.confidence);
        if best_confidence < self.policy.auto_skip_threshold && platform.is_aggregator() {
            let containment = analyze_containment(event, existing);
            let merged_confidence = containment
                .confidence(&self.policy)
                .filter(|confidence| *confidence > best_confidence);

            if let Some(confidence) = merged_confidence {
                let mut merged =
                    EchoMatchResult::decided(confidence, vec![containment.reason()], &self.policy);
                merged.matched_booking_id = containment.covering_booking_id;
                merged.matched_event_id = containment.covering_event_id;
                merged.merged_record_ids = containment.covering_ids;
                result = Some(merged);
            }
        }

        let result =
            result.unwrap_or_else(|| EchoMatchResult::unique("no matching bookings found"));

        info!(
            event = %event.label(),
            source = %event.source,
            confidence = result.confidence,
            action = %result.recommended_action,
            matched = result.matched_id().unwrap_or("-"),
            "echo analysis complete"
        );

        result
    }

    /// Existing records close enough in time to be scored.
    pub fn find_matching_bookings<'r>(
        &self,
        event: &IncomingEvent,
        existing: &'r [ExistingRecord],
    ) -> Vec<&'r ExistingRecord> {
        find_matching_bookings(event, existing, self.registry, &self.policy)
    }

    /// Score one candidate on all five factors.
    pub fn analyze_match(&self, event: &IncomingEvent, record: &ExistingRecord) -> MatchAnalysis {
        let incoming_platform = self.registry.get(&event.source);
        let existing_platform = self.registry.get(&record.source);
        let incoming = event.stay();
        let existing = record.stay();
        let weights = &self.policy.weights;

        let date = factors::date_match(&incoming, &existing, incoming_platform, &self.policy);
        let duration = factors::duration_match(&incoming, &existing);
        let export = factors::export_correlation(record, incoming_platform);
        let platform = factors::platform_profile(incoming_platform, existing_platform);
        let temporal = factors::temporal(event.imported_at, record.imported_at, &self.policy);

        let weighted = date.score * weights.date
            + duration.score * weights.duration
            + export.score * weights.export
            + platform.score * weights.platform
            + temporal.score * weights.temporal;

        MatchAnalysis {
            record_id: record.id.clone(),
            record_kind: record.kind,
            date,
            duration,
            export,
            platform,
            temporal,
            confidence: round_confidence(weighted.min(1.0)),
        }
    }
}

/// Analyze with the built-in registry and the default policy.
pub fn analyze_event(event: &IncomingEvent, existing: &[ExistingRecord]) -> EchoMatchResult {
    EchoAnalyzer::default().analyze_event(event, existing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::echo::RecommendedAction;
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
    }

    fn record(id: &str, kind: RecordKind, check_in: NaiveDate, nights: i64, source: &str) -> ExistingRecord {
        ExistingRecord::new(id, kind, check_in, check_in + Duration::days(nights), source, t0())
    }

    #[test]
    fn authoritative_incoming_is_never_an_echo() {
        let existing = vec![record("bk_1", RecordKind::Booking, date(2025, 7, 10), 7, "direct")];
        for source in ["airbnb", "booking_com", "direct", "widget"] {
            let event = IncomingEvent::new(
                date(2025, 7, 10),
                date(2025, 7, 17),
                source,
                t0() + Duration::hours(5),
            );
            let result = analyze_event(&event, &existing);
            assert_eq!(result.confidence, 0.0);
            assert_eq!(result.recommended_action, RecommendedAction::SaveUnique);
            assert!(!result.is_probable_echo);
            assert_eq!(result.reasons, vec!["authoritative source cannot be echo"]);
        }
    }

    #[test]
    fn nothing_in_window_saves_unique() {
        let existing = vec![record("bk_1", RecordKind::Booking, date(2025, 9, 1), 7, "direct")];
        let event = IncomingEvent::new(date(2025, 7, 10), date(2025, 7, 17), "adriagate", t0());

        let result = analyze_event(&event, &existing);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.recommended_action, RecommendedAction::SaveUnique);
        assert_eq!(result.reasons, vec!["no matching bookings found"]);
    }

    #[test]
    fn picks_highest_confidence_candidate() {
        let existing = vec![
            record("loose", RecordKind::Booking, date(2025, 7, 12), 7, "direct"),
            record("exact", RecordKind::Booking, date(2025, 7, 10), 7, "direct"),
        ];
        let event = IncomingEvent::new(
            date(2025, 7, 10),
            date(2025, 7, 17),
            "adriagate",
            t0() + Duration::hours(4),
        );

        let result = analyze_event(&event, &existing);
        assert_eq!(result.matched_booking_id.as_deref(), Some("exact"));
        assert!(result.matched_event_id.is_none());
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.recommended_action, RecommendedAction::AutoSkip);
        assert_eq!(result.reasons.len(), 5);
        assert_eq!(result.reasons[0], "exact date match");
    }

    #[test]
    fn ties_keep_the_first_candidate() {
        let existing = vec![
            record("first", RecordKind::Booking, date(2025, 7, 10), 7, "direct"),
            record("second", RecordKind::Booking, date(2025, 7, 10), 7, "widget"),
        ];
        let event = IncomingEvent::new(
            date(2025, 7, 10),
            date(2025, 7, 17),
            "adriagate",
            t0() + Duration::hours(4),
        );

        assert_eq!(analyze_event(&event, &existing).matched_id(), Some("first"));
    }

    #[test]
    fn imported_event_match_reports_event_id() {
        let existing = vec![record("ev_9", RecordKind::IcalEvent, date(2025, 7, 10), 7, "airbnb")];
        let event = IncomingEvent::new(
            date(2025, 7, 10),
            date(2025, 7, 17),
            "adriagate",
            t0() + Duration::hours(4),
        );

        let result = analyze_event(&event, &existing);
        assert_eq!(result.matched_event_id.as_deref(), Some("ev_9"));
        assert!(result.matched_booking_id.is_none());
        // 0.25 + 0.25 + 0.9 * 0.25 + 0.15 + 0.10
        assert_eq!(result.confidence, 0.975);
        assert_eq!(result.recommended_action, RecommendedAction::AutoSkip);
    }

    #[test]
    fn exact_cover_overrides_the_booking_race_guard() {
        let existing = vec![record("bk_1", RecordKind::Booking, date(2025, 7, 10), 7, "direct")];
        let event = IncomingEvent::new(
            date(2025, 7, 10),
            date(2025, 7, 17),
            "adriagate",
            t0() + Duration::minutes(5),
        );

        // Everything but the temporal factor is perfect
        let analysis = EchoAnalyzer::default().analyze_match(&event, &existing[0]);
        assert_eq!(analysis.confidence, 0.9);

        let result = analyze_event(&event, &existing);
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.recommended_action, RecommendedAction::AutoSkip);
        assert_eq!(result.matched_booking_id.as_deref(), Some("bk_1"));
        assert_eq!(result.merged_record_ids, vec!["bk_1"]);
    }

    #[test]
    fn booking_spanning_the_whole_event_overrides_weak_match() {
        let existing = vec![record("bk_long", RecordKind::Booking, date(2025, 8, 1), 21, "direct")];
        let event = IncomingEvent::new(
            date(2025, 8, 1),
            date(2025, 8, 21),
            "other",
            t0() + Duration::hours(3),
        );

        // 0.9 date, 0.7 duration, 0.8 export, 0.7 platform, 1.0 temporal
        let analysis = EchoAnalyzer::default().analyze_match(&event, &existing[0]);
        assert_eq!(analysis.confidence, 0.805);

        let result = analyze_event(&event, &existing);
        assert_eq!(result.confidence, 0.96);
        assert_eq!(result.recommended_action, RecommendedAction::AutoSkip);
        assert_eq!(result.merged_record_ids, vec!["bk_long"]);
        assert_eq!(
            result.reasons,
            vec!["merged echo: all 20 nights already blocked by 1 overlapping booking"]
        );
    }

    #[test]
    fn authoritative_cover_is_not_checked_for_containment() {
        let existing = vec![record("bk_long", RecordKind::Booking, date(2025, 8, 1), 21, "direct")];
        let event = IncomingEvent::new(
            date(2025, 8, 1),
            date(2025, 8, 21),
            "airbnb",
            t0() + Duration::hours(3),
        );

        let result = analyze_event(&event, &existing);
        assert_eq!(result.recommended_action, RecommendedAction::SaveUnique);
        assert!(result.merged_record_ids.is_empty());
    }

    #[test]
    fn custom_policy_changes_the_decision() {
        // Shifted by a day so the stay is not fully blocked:
        // 0.9 * 0.25 + 0.25 + 0.25 + 0.15 + 0 = 0.875
        let existing = vec![record("bk_1", RecordKind::Booking, date(2025, 7, 11), 7, "direct")];
        let event = IncomingEvent::new(
            date(2025, 7, 10),
            date(2025, 7, 17),
            "adriagate",
            t0() + Duration::minutes(5),
        );

        let default_result = analyze_event(&event, &existing);
        assert_eq!(default_result.confidence, 0.875);
        assert_eq!(default_result.recommended_action, RecommendedAction::FlagReview);

        let registry = PlatformRegistry::builtin();
        let policy = EchoPolicy {
            flag_review_threshold: 0.95,
            auto_skip_threshold: 0.99,
            ..EchoPolicy::default()
        };
        let analyzer = EchoAnalyzer::new(&registry, policy);

        let result = analyzer.analyze_event(&event, &existing);
        assert_eq!(result.confidence, 0.875);
        assert_eq!(result.recommended_action, RecommendedAction::SaveUnique);
        assert!(!result.is_probable_echo);
    }
}
