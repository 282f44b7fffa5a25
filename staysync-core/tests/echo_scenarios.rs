//! End-to-end scenarios for the echo analyzer, driven through the public API.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use staysync_core::echo::EchoAnalyzer;
use staysync_core::{
    ExistingRecord, IncomingEvent, RecommendedAction, RecordKind, analyze_event,
    get_platform_config, is_authoritative,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
}

fn existing(id: &str, kind: RecordKind, check_in: NaiveDate, check_out: NaiveDate, source: &str) -> ExistingRecord {
    ExistingRecord::new(id, kind, check_in, check_out, source, t0())
}

#[test]
fn holiday_home_shifted_echo_is_auto_skipped() {
    let event = IncomingEvent::new(
        date(2025, 7, 10),
        date(2025, 7, 17),
        "holiday-home",
        t0() + Duration::hours(3),
    );
    let records = vec![existing(
        "bk_native",
        RecordKind::Booking,
        date(2025, 6, 11),
        date(2025, 6, 18),
        "direct",
    )];

    let analysis = EchoAnalyzer::default().analyze_match(&event, &records[0]);
    assert_eq!(analysis.date.score, 0.95);
    assert_eq!(analysis.duration.score, 1.0);
    assert_eq!(analysis.export.score, 1.0);
    assert_eq!(analysis.platform.score, 1.0);
    assert_eq!(analysis.temporal.score, 1.0);

    let result = analyze_event(&event, &records);
    assert_eq!(result.confidence, 0.9875);
    assert_eq!(result.recommended_action, RecommendedAction::AutoSkip);
    assert!(result.is_probable_echo);
    assert_eq!(result.matched_booking_id.as_deref(), Some("bk_native"));
    assert_eq!(
        result.reasons,
        analysis.reasons(),
        "reasons should follow factor order"
    );
}

#[test]
fn authoritative_sources_short_circuit_regardless_of_records() {
    let records = vec![
        existing("bk_1", RecordKind::Booking, date(2025, 7, 10), date(2025, 7, 17), "direct"),
        existing("ev_1", RecordKind::IcalEvent, date(2025, 7, 10), date(2025, 7, 17), "holiday-home"),
    ];

    for source in ["booking_com", "airbnb", "direct", "widget"] {
        assert!(is_authoritative(source));
        let event = IncomingEvent::new(
            date(2025, 7, 10),
            date(2025, 7, 17),
            source,
            t0() + Duration::hours(8),
        );
        let result = analyze_event(&event, &records);
        assert_eq!(result.confidence, 0.0, "{source}");
        assert_eq!(result.recommended_action, RecommendedAction::SaveUnique);
    }
}

#[test]
fn same_feed_records_are_never_matched() {
    let event = IncomingEvent::new(
        date(2025, 7, 10),
        date(2025, 7, 17),
        "holiday-home",
        t0() + Duration::hours(3),
    );
    let records = vec![existing(
        "ev_prev",
        RecordKind::IcalEvent,
        date(2025, 7, 10),
        date(2025, 7, 17),
        "holiday-home",
    )];

    let analyzer = EchoAnalyzer::default();
    assert!(analyzer.find_matching_bookings(&event, &records).is_empty());

    let result = analyzer.analyze_event(&event, &records);
    assert_eq!(result.confidence, 0.0);
    assert_eq!(result.reasons, vec!["no matching bookings found"]);
    assert!(result.matched_id().is_none());
}

#[test]
fn duration_factor_ignores_registered_shift() {
    let shift = get_platform_config("holiday-home").date_shift_days;
    let native_in = date(2025, 3, 2);
    let record = existing(
        "bk_1",
        RecordKind::Booking,
        native_in,
        native_in + Duration::days(5),
        "widget",
    );
    let event = IncomingEvent::new(
        native_in + Duration::days(shift),
        native_in + Duration::days(shift + 5),
        "holiday-home",
        t0(),
    );

    let analysis = EchoAnalyzer::default().analyze_match(&event, &record);
    assert_eq!(analysis.duration.score, 1.0);
}

#[test]
fn temporal_factor_never_decreases_with_gap() {
    let analyzer = EchoAnalyzer::default();
    let record = existing("bk_1", RecordKind::Booking, date(2025, 7, 10), date(2025, 7, 17), "direct");

    let gaps = [5, 10, 11, 30, 60, 65, 90, 119, 120, 150, 180];
    let scores: Vec<f64> = gaps
        .iter()
        .map(|minutes| {
            let event = IncomingEvent::new(
                date(2025, 7, 10),
                date(2025, 7, 17),
                "adriagate",
                t0() + Duration::minutes(*minutes),
            );
            analyzer.analyze_match(&event, &record).temporal.score
        })
        .collect();

    assert!(scores.windows(2).all(|w| w[0] <= w[1]), "scores: {scores:?}");
    assert_eq!(scores.first(), Some(&0.0));
    assert_eq!(scores.last(), Some(&1.0));
}

#[test]
fn confidence_of_exactly_auto_skip_threshold_skips() {
    // Perfect on every factor except temporal, which scores 0.5 at 65 minutes:
    // 0.25 + 0.25 + 0.25 + 0.15 + 0.5 * 0.10 = 0.95
    let event = IncomingEvent::new(
        date(2025, 7, 10),
        date(2025, 7, 17),
        "adriagate",
        t0() + Duration::minutes(65),
    );
    let records = vec![existing("bk_1", RecordKind::Booking, date(2025, 7, 10), date(2025, 7, 17), "direct")];

    let result = analyze_event(&event, &records);
    assert_eq!(result.confidence, 0.95);
    assert_eq!(result.recommended_action, RecommendedAction::AutoSkip);
}

#[test]
fn decision_boundaries() {
    let policy = EchoAnalyzer::default().policy().clone();
    assert_eq!(
        RecommendedAction::from_confidence(0.95, &policy),
        RecommendedAction::AutoSkip
    );
    assert_eq!(
        RecommendedAction::from_confidence(0.94999, &policy),
        RecommendedAction::FlagReview
    );
    assert_eq!(
        RecommendedAction::from_confidence(0.84999, &policy),
        RecommendedAction::SaveUnique
    );
}

#[test]
fn merged_echo_of_two_adjacent_bookings_is_auto_skipped() {
    let d = date(2025, 8, 1);
    let event = IncomingEvent::new(
        d,
        d + Duration::days(7),
        "adriagate",
        t0() + Duration::hours(3),
    );
    let records = vec![
        existing("bk_a", RecordKind::Booking, d, d + Duration::days(3), "direct"),
        existing("bk_b", RecordKind::Booking, d + Duration::days(3), d + Duration::days(7), "airbnb"),
    ];

    let result = analyze_event(&event, &records);
    assert_eq!(result.confidence, 1.0);
    assert_eq!(result.recommended_action, RecommendedAction::AutoSkip);
    assert_eq!(result.merged_record_ids, vec!["bk_a", "bk_b"]);
    assert_eq!(result.matched_booking_id.as_deref(), Some("bk_a"));
    assert!(result.reasons[0].contains("all 7 nights already blocked"));
}

#[test]
fn partially_blocked_merge_is_imported() {
    let d = date(2025, 8, 1);
    let event = IncomingEvent::new(
        d,
        d + Duration::days(10),
        "atraveo",
        t0() + Duration::hours(3),
    );
    let records = vec![
        existing("bk_a", RecordKind::Booking, d, d + Duration::days(3), "direct"),
        existing("bk_b", RecordKind::Booking, d + Duration::days(5), d + Duration::days(10), "direct"),
    ];

    let result = analyze_event(&event, &records);
    assert!(result.merged_record_ids.is_empty());
    assert_eq!(result.recommended_action, RecommendedAction::SaveUnique);
}

#[test]
fn overlapping_bookings_covering_a_merge_outscore_their_one_to_one_match() {
    let d = date(2025, 8, 1);
    let event = IncomingEvent::new(
        d,
        d + Duration::days(7),
        "adriagate",
        t0() + Duration::hours(3),
    );
    // Both share the night of Aug 4th
    let records = vec![
        existing("bk_a", RecordKind::Booking, d, d + Duration::days(4), "direct"),
        existing("bk_b", RecordKind::Booking, d + Duration::days(3), d + Duration::days(7), "widget"),
    ];

    let analyzer = EchoAnalyzer::default();
    let best_single = records
        .iter()
        .map(|record| analyzer.analyze_match(&event, record).confidence)
        .fold(0.0, f64::max);
    assert_eq!(best_single, 0.675);

    let result = analyzer.analyze_event(&event, &records);
    assert_eq!(result.confidence, 0.96);
    assert_eq!(result.recommended_action, RecommendedAction::AutoSkip);
    assert_eq!(result.merged_record_ids, vec!["bk_a", "bk_b"]);
    assert!(result.reasons[0].contains("2 overlapping bookings"));
}

#[test]
fn nearly_blocked_stay_is_flagged_over_its_one_to_one_match() {
    let d = date(2025, 8, 1);
    let event = IncomingEvent::new(
        d,
        d + Duration::days(20),
        "other",
        t0() + Duration::hours(3),
    );
    // 19 of the 20 nights
    let records = vec![existing("bk_a", RecordKind::Booking, d, d + Duration::days(19), "direct")];

    let analysis = EchoAnalyzer::default().analyze_match(&event, &records[0]);
    assert_eq!(analysis.confidence, 0.805);

    let result = analyze_event(&event, &records);
    assert_eq!(result.confidence, 0.90);
    assert_eq!(result.recommended_action, RecommendedAction::FlagReview);
    assert!(result.is_probable_echo);
    assert_eq!(result.matched_booking_id.as_deref(), Some("bk_a"));
    assert!(result.reasons[0].contains("19 of 20 nights"));
}

#[test]
fn two_authoritative_sources_score_zero_on_platform_factor() {
    let event = IncomingEvent::new(
        date(2025, 7, 10),
        date(2025, 7, 17),
        "airbnb",
        t0() + Duration::hours(3),
    );
    let record = existing("ev_bcom", RecordKind::IcalEvent, date(2025, 7, 10), date(2025, 7, 17), "booking_com");

    let analysis = EchoAnalyzer::default().analyze_match(&event, &record);
    assert_eq!(analysis.platform.score, 0.0);
    assert_eq!(analysis.date.score, 1.0);
    assert_eq!(analysis.duration.score, 1.0);
    assert_eq!(analysis.temporal.score, 1.0);
}

#[test]
fn analyzer_is_shareable_across_threads() {
    let analyzer = EchoAnalyzer::default();
    let records = vec![existing("bk_1", RecordKind::Booking, date(2025, 7, 10), date(2025, 7, 17), "direct")];

    let actions: Vec<RecommendedAction> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let analyzer = &analyzer;
                let records = &records;
                scope.spawn(move || {
                    let event = IncomingEvent::new(
                        date(2025, 7, 10),
                        date(2025, 7, 17),
                        "adriagate",
                        t0() + Duration::hours(3 + i),
                    );
                    analyzer.analyze_event(&event, records).recommended_action
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(actions.iter().all(|a| *a == RecommendedAction::AutoSkip));
}
