use anyhow::Result;
use owo_colors::OwoColorize;
use staysync_core::staysync::Staysync;

use crate::render::render_policy;

pub fn run(staysync: &Staysync) -> Result<()> {
    println!("{}", "Paths".bold());
    println!("  Config:       {}", staysync.config_path().display());

    println!("\n{}", "Policy".bold());
    for line in render_policy(staysync.policy()) {
        println!("{}", line);
    }

    let overrides = &staysync.config().platforms;
    if !overrides.is_empty() {
        println!("\n{}", "Platform overrides".bold());
        for id in overrides.keys() {
            println!("  {}", id);
        }
    }

    Ok(())
}
