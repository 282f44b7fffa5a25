//! Classify every event of one feed snapshot against the same unit records.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::echo::analyzer::EchoAnalyzer;
use crate::echo::result::{EchoMatchResult, RecommendedAction};
use crate::record::{ExistingRecord, IncomingEvent};

#[derive(Debug, Clone, Serialize)]
pub struct TriageEntry {
    pub event: IncomingEvent,
    pub result: EchoMatchResult,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TriageStats {
    pub auto_skip: usize,
    pub flag_review: usize,
    pub save_unique: usize,
}

impl TriageStats {
    pub fn record(&mut self, action: RecommendedAction) {
        match action {
            RecommendedAction::AutoSkip => self.auto_skip += 1,
            RecommendedAction::FlagReview => self.flag_review += 1,
            RecommendedAction::SaveUnique => self.save_unique += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.auto_skip + self.flag_review + self.save_unique
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TriageReport {
    pub entries: Vec<TriageEntry>,
    pub stats: TriageStats,
    /// Per-source tallies, keyed by the source string as given
    pub by_source: BTreeMap<String, TriageStats>,
}

impl EchoAnalyzer<'_> {
    /// Analyze each incoming event independently against `existing`.
    ///
    /// Events are not added to the candidate pool as they are classified;
    /// deciding what to persist stays with the caller.
    pub fn triage(&self, events: &[IncomingEvent], existing: &[ExistingRecord]) -> TriageReport {
        let mut report = TriageReport::default();

        for event in events {
            let result = self.analyze_event(event, existing);
            report.stats.record(result.recommended_action);
            report
                .by_source
                .entry(event.source.clone())
                .or_default()
                .record(result.recommended_action);
            report.entries.push(TriageEntry {
                event: event.clone(),
                result,
            });
        }

        report
    }
}
