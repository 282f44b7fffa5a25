//! JSON inputs for the analyze and triage commands.

use std::io::Read;

use anyhow::{Context, Result};
use serde::Deserialize;
use staysync_core::staysync::Staysync;
use staysync_core::{ExistingRecord, IncomingEvent};
use tracing::debug;

/// One incoming event plus the unit's existing records.
#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub event: IncomingEvent,
    #[serde(default)]
    pub existing: Vec<ExistingRecord>,
}

/// Every event of one feed fetch plus the unit's existing records.
#[derive(Debug, Deserialize)]
pub struct FeedSnapshot {
    pub events: Vec<IncomingEvent>,
    #[serde(default)]
    pub existing: Vec<ExistingRecord>,
}

impl Scenario {
    pub fn load(file: Option<&str>) -> Result<Self> {
        let content = read_input(file)?;
        let scenario: Scenario =
            serde_json::from_str(&content).context("Could not parse scenario JSON")?;

        scenario.event.validate()?;
        validate_existing(&scenario.existing)?;

        debug!(existing = scenario.existing.len(), "loaded scenario");

        Ok(scenario)
    }
}

impl FeedSnapshot {
    pub fn load(file: Option<&str>) -> Result<Self> {
        let content = read_input(file)?;
        let snapshot: FeedSnapshot =
            serde_json::from_str(&content).context("Could not parse feed snapshot JSON")?;

        for event in &snapshot.events {
            event.validate()?;
        }
        validate_existing(&snapshot.existing)?;

        debug!(
            events = snapshot.events.len(),
            existing = snapshot.existing.len(),
            "loaded feed snapshot"
        );

        Ok(snapshot)
    }
}

fn validate_existing(existing: &[ExistingRecord]) -> Result<()> {
    for record in existing {
        record.validate()?;
    }
    Ok(())
}

/// Read a file, or stdin when no path (or "-") is given.
fn read_input(file: Option<&str>) -> Result<String> {
    match file {
        None | Some("-") => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("Could not read stdin")?;
            Ok(content)
        }
        Some(path) => {
            let path = Staysync::expand_path(path);
            std::fs::read_to_string(&path)
                .with_context(|| format!("Could not read {}", path.display()))
        }
    }
}
