use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::CONFIDENCE_DECIMALS;
use crate::policy::EchoPolicy;

/// What the sync layer should do with an incoming event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    /// Certain duplicate: log it, do not import
    AutoSkip,
    /// Import, but mark it for human review
    FlagReview,
    /// Import normally as a new booking/event
    SaveUnique,
}

impl RecommendedAction {
    pub fn from_confidence(confidence: f64, policy: &EchoPolicy) -> Self {
        if confidence >= policy.auto_skip_threshold {
            RecommendedAction::AutoSkip
        } else if confidence >= policy.flag_review_threshold {
            RecommendedAction::FlagReview
        } else {
            RecommendedAction::SaveUnique
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendedAction::AutoSkip => "auto_skip",
            RecommendedAction::FlagReview => "flag_review",
            RecommendedAction::SaveUnique => "save_unique",
        }
    }
}

impl fmt::Display for RecommendedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of analyzing one incoming event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EchoMatchResult {
    pub is_probable_echo: bool,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_booking_id: Option<String>,
    pub reasons: Vec<String>,
    pub recommended_action: RecommendedAction,
    /// Records whose union covered a merged echo
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merged_record_ids: Vec<String>,
}

impl EchoMatchResult {
    /// A result that imports the event as new, with zero confidence.
    pub fn unique(reason: impl Into<String>) -> Self {
        EchoMatchResult {
            is_probable_echo: false,
            confidence: 0.0,
            matched_event_id: None,
            matched_booking_id: None,
            reasons: vec![reason.into()],
            recommended_action: RecommendedAction::SaveUnique,
            merged_record_ids: Vec::new(),
        }
    }

    /// A result classified from `confidence` against the policy thresholds.
    pub fn decided(confidence: f64, reasons: Vec<String>, policy: &EchoPolicy) -> Self {
        let confidence = round_confidence(confidence);
        EchoMatchResult {
            is_probable_echo: confidence >= policy.flag_review_threshold,
            confidence,
            matched_event_id: None,
            matched_booking_id: None,
            reasons,
            recommended_action: RecommendedAction::from_confidence(confidence, policy),
            merged_record_ids: Vec::new(),
        }
    }

    /// Id of whichever record was matched, booking first.
    pub fn matched_id(&self) -> Option<&str> {
        self.matched_booking_id
            .as_deref()
            .or(self.matched_event_id.as_deref())
    }
}

/// Cap to [0, 1] and drop floating-point noise below `CONFIDENCE_DECIMALS`.
pub fn round_confidence(confidence: f64) -> f64 {
    let scale = 10f64.powi(CONFIDENCE_DECIMALS);
    ((confidence.clamp(0.0, 1.0)) * scale).round() / scale
}
