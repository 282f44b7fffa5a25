//! Echo detection for imported calendar events.

mod analyzer;
mod containment;
mod factors;
mod matching;
mod result;
mod triage;

pub use analyzer::{EchoAnalyzer, MatchAnalysis, analyze_event};
pub use containment::{Containment, analyze_containment};
pub use factors::FactorScore;
pub use matching::find_matching_bookings;
pub use result::{EchoMatchResult, RecommendedAction, round_confidence};
pub use triage::{TriageEntry, TriageReport, TriageStats};
