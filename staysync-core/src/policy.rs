//! Scoring policy: factor weights, decision thresholds and time windows.
//!
//! `EchoPolicy::default()` is the production policy. Deployments that see a
//! different aggregator mix can override individual values in the `[policy]`
//! table of the global config.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{StaysyncError, StaysyncResult};

/// Relative weight of each scoring factor. Must sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorWeights {
    pub date: f64,
    pub duration: f64,
    pub export: f64,
    pub platform: f64,
    pub temporal: f64,
}

impl Default for FactorWeights {
    fn default() -> Self {
        FactorWeights {
            date: 0.25,
            duration: 0.25,
            export: 0.25,
            platform: 0.15,
            temporal: 0.10,
        }
    }
}

impl FactorWeights {
    pub fn sum(&self) -> f64 {
        self.date + self.duration + self.export + self.platform + self.temporal
    }

    fn as_array(&self) -> [(&'static str, f64); 5] {
        [
            ("date", self.date),
            ("duration", self.duration),
            ("export", self.export),
            ("platform", self.platform),
            ("temporal", self.temporal),
        ]
    }
}

/// Confidences assigned by the merged-echo containment check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainmentPolicy {
    /// Every night covered by an exact, non-overlapping union of records
    pub exact_union: f64,
    /// Every night covered, but the covering records overlap or spill over
    pub overlapping_union: f64,
    /// At least `near_full_ratio` of the nights covered
    pub near_full: f64,
    pub near_full_ratio: f64,
}

impl Default for ContainmentPolicy {
    fn default() -> Self {
        ContainmentPolicy {
            exact_union: 1.0,
            overlapping_union: 0.96,
            near_full: 0.90,
            near_full_ratio: 0.95,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EchoPolicy {
    pub weights: FactorWeights,
    pub auto_skip_threshold: f64,
    pub flag_review_threshold: f64,
    /// Added to the incoming platform's known shift to get the match window
    pub date_tolerance_days: i64,
    /// Window around a known shift when filtering candidates
    pub corruption_tolerance_days: i64,
    /// Window around a known shift when scoring the date factor
    pub shift_match_tolerance_days: i64,
    pub race_window_minutes: i64,
    pub resync_delay_minutes: i64,
    pub containment: ContainmentPolicy,
}

impl Default for EchoPolicy {
    fn default() -> Self {
        EchoPolicy {
            weights: FactorWeights::default(),
            auto_skip_threshold: DEFAULT_AUTO_SKIP_THRESHOLD,
            flag_review_threshold: DEFAULT_FLAG_REVIEW_THRESHOLD,
            date_tolerance_days: DEFAULT_DATE_TOLERANCE_DAYS,
            corruption_tolerance_days: DEFAULT_CORRUPTION_TOLERANCE_DAYS,
            shift_match_tolerance_days: DEFAULT_SHIFT_MATCH_TOLERANCE_DAYS,
            race_window_minutes: DEFAULT_RACE_WINDOW_MINUTES,
            resync_delay_minutes: DEFAULT_RESYNC_DELAY_MINUTES,
            containment: ContainmentPolicy::default(),
        }
    }
}

impl EchoPolicy {
    /// Check that the policy is internally consistent.
    pub fn validate(&self) -> StaysyncResult<()> {
        for (name, weight) in self.weights.as_array() {
            if !(0.0..=1.0).contains(&weight) {
                return Err(invalid(format!("weight '{name}' must be within 0..=1, got {weight}")));
            }
        }

        let sum = self.weights.sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(invalid(format!("weights must sum to 1, got {sum}")));
        }

        if !(self.flag_review_threshold > 0.0
            && self.flag_review_threshold <= self.auto_skip_threshold
            && self.auto_skip_threshold <= 1.0)
        {
            return Err(invalid(format!(
                "thresholds must satisfy 0 < flag_review ({}) <= auto_skip ({}) <= 1",
                self.flag_review_threshold, self.auto_skip_threshold
            )));
        }

        if self.date_tolerance_days < 0
            || self.corruption_tolerance_days < 0
            || self.shift_match_tolerance_days < 0
        {
            return Err(invalid("day tolerances must not be negative".to_string()));
        }

        if self.race_window_minutes < 0 || self.resync_delay_minutes <= self.race_window_minutes {
            return Err(invalid(format!(
                "resync delay ({} min) must exceed the race window ({} min)",
                self.resync_delay_minutes, self.race_window_minutes
            )));
        }

        let c = &self.containment;
        for (name, value) in [
            ("exact_union", c.exact_union),
            ("overlapping_union", c.overlapping_union),
            ("near_full", c.near_full),
            ("near_full_ratio", c.near_full_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(format!("containment.{name} must be within 0..=1, got {value}")));
            }
        }

        Ok(())
    }
}

fn invalid(message: String) -> StaysyncError {
    StaysyncError::InvalidPolicy(message)
}
