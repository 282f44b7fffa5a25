//! Log setup. Logs go to stderr so `--json` output on stdout stays clean.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber. `RUST_LOG` wins over `-v` when set.
pub fn init(verbosity: u8) -> Result<()> {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("staysync_core={level},staysync={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity >= 2)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("Could not initialize logging: {e}"))?;

    Ok(())
}
