use anyhow::Result;
use owo_colors::OwoColorize;
use staysync_core::staysync::Staysync;

use crate::render::Render;
use crate::snapshot::Scenario;

pub fn run(staysync: &Staysync, file: Option<&str>, json: bool) -> Result<()> {
    let scenario = Scenario::load(file)?;
    let result = staysync
        .analyzer()
        .analyze_event(&scenario.event, &scenario.existing);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("📅 {}", scenario.event.to_string().bold());
    println!(
        "   {}",
        format!("against {} existing records", scenario.existing.len()).dimmed()
    );
    println!();
    println!("{}", result.render());

    Ok(())
}
