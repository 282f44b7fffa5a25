use anyhow::Result;
use owo_colors::OwoColorize;
use staysync_core::echo::RecommendedAction;
use staysync_core::staysync::Staysync;

use crate::render::Render;
use crate::snapshot::FeedSnapshot;

pub fn run(staysync: &Staysync, file: Option<&str>, json: bool, all: bool) -> Result<()> {
    let snapshot = FeedSnapshot::load(file)?;
    let report = staysync
        .analyzer()
        .triage(&snapshot.events, &snapshot.existing);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.entries.is_empty() {
        println!("{}", "No events in snapshot.".dimmed());
        return Ok(());
    }

    for entry in &report.entries {
        // Imports that go through untouched are only listed with --all
        if !all && entry.result.recommended_action == RecommendedAction::SaveUnique {
            continue;
        }

        println!(
            "{} {} {}",
            entry.result.recommended_action.render(),
            entry.event.label(),
            entry.event.to_string().dimmed()
        );
        if let Some(id) = entry.result.matched_id() {
            println!("   {} {}", "matches".dimmed(), id);
        }
    }

    if report.by_source.len() > 1 {
        println!();
        for (source, stats) in &report.by_source {
            println!("  {:<14} {}", source, stats.render());
        }
    }

    println!("\nTotal: {}", report.stats.render());

    Ok(())
}
