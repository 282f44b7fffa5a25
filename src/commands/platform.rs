use anyhow::Result;
use owo_colors::OwoColorize;
use staysync_core::constants::FALLBACK_PLATFORM;
use staysync_core::platform::normalize_source;
use staysync_core::staysync::Staysync;

use crate::render::render_platform;

pub fn run(staysync: &Staysync, source: &str) -> Result<()> {
    let registry = staysync.registry();
    let config = registry.get(source);

    if registry.is_registered(source) {
        println!("{}", render_platform(&normalize_source(source), config));
    } else {
        println!(
            "{}",
            format!("'{source}' is not registered, using the '{FALLBACK_PLATFORM}' profile").yellow()
        );
        println!("{}", render_platform(FALLBACK_PLATFORM, config));
    }

    if config.is_authoritative() {
        println!(
            "   {}",
            "Events from this source are never treated as echoes.".dimmed()
        );
    }

    Ok(())
}
