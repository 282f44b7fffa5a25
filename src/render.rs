//! TUI rendering traits for staysync types.
//!
//! Extension traits that add colored terminal rendering to staysync-core
//! types using owo_colors.

use owo_colors::OwoColorize;
use staysync_core::echo::{EchoMatchResult, RecommendedAction, TriageStats};
use staysync_core::platform::{PlatformConfig, PlatformKind};
use staysync_core::policy::EchoPolicy;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for RecommendedAction {
    fn render(&self) -> String {
        let label = self.as_str();
        match self {
            RecommendedAction::AutoSkip => label.red().to_string(),
            RecommendedAction::FlagReview => label.yellow().to_string(),
            RecommendedAction::SaveUnique => label.green().to_string(),
        }
    }
}

impl Render for EchoMatchResult {
    fn render(&self) -> String {
        let mut lines = vec![format!(
            "{} {}",
            self.recommended_action.render(),
            format!("({:.1}% confidence)", self.confidence * 100.0).dimmed()
        )];

        if let Some(id) = &self.matched_booking_id {
            lines.push(format!("   {} {}", "booking:".dimmed(), id));
        }
        if let Some(id) = &self.matched_event_id {
            lines.push(format!("   {} {}", "event:".dimmed(), id));
        }
        if self.merged_record_ids.len() > 1 {
            lines.push(format!(
                "   {} {}",
                "merged:".dimmed(),
                self.merged_record_ids.join(", ")
            ));
        }

        for reason in &self.reasons {
            lines.push(format!("   - {}", reason));
        }

        lines.join("\n")
    }
}

impl Render for PlatformKind {
    fn render(&self) -> String {
        match self {
            PlatformKind::Authoritative => self.to_string().green().to_string(),
            PlatformKind::Aggregator => self.to_string().yellow().to_string(),
        }
    }
}

impl Render for TriageStats {
    fn render(&self) -> String {
        format!(
            "{} skipped, {} flagged, {} new",
            self.auto_skip.red(),
            self.flag_review.yellow(),
            self.save_unique.green()
        )
    }
}

/// One line per platform: id, kind, priority, re-export and shift.
pub fn render_platform(id: &str, config: &PlatformConfig) -> String {
    let mut line = format!(
        "{:<14} {:<24} {} {}",
        id.bold(),
        config.display_name,
        config.kind.render(),
        format!("priority {}", config.priority).dimmed()
    );

    line.push_str(&format!(" {}", format!("re-exports: {}", config.re_exports).dimmed()));

    if config.has_date_corruption {
        line.push_str(&format!(
            " {}",
            format!("shifts dates by {} days", config.date_shift_days).red()
        ));
    }
    if let Some(param) = &config.opt_out_param {
        line.push_str(&format!(" {}", format!("opt-out: ?{param}").dimmed()));
    }

    line
}

/// Policy as indented key/value lines.
pub fn render_policy(policy: &EchoPolicy) -> Vec<String> {
    let w = &policy.weights;
    let c = &policy.containment;
    vec![
        format!(
            "  Weights:      date {} · duration {} · export {} · platform {} · temporal {}",
            w.date, w.duration, w.export, w.platform, w.temporal
        ),
        format!(
            "  Thresholds:   auto_skip ≥ {} · flag_review ≥ {}",
            policy.auto_skip_threshold, policy.flag_review_threshold
        ),
        format!(
            "  Date window:  shift + {} days (± {} around a known shift)",
            policy.date_tolerance_days, policy.corruption_tolerance_days
        ),
        format!(
            "  Import gap:   race ≤ {} min · re-sync ≥ {} min",
            policy.race_window_minutes, policy.resync_delay_minutes
        ),
        format!(
            "  Containment:  exact {} · overlapping {} · ≥{}% covered {}",
            c.exact_union,
            c.overlapping_union,
            c.near_full_ratio * 100.0,
            c.near_full
        ),
    ]
}
