mod commands;
mod logging;
mod render;
mod snapshot;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use staysync_core::staysync::Staysync;

#[derive(Parser)]
#[command(name = "staysync")]
#[command(about = "Classify imported rental-calendar events as echoes, review cases or new bookings")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Use this config file instead of ~/.config/staysync/config.toml
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one incoming event against a unit's existing records
    Analyze {
        /// Scenario JSON ({"event": ..., "existing": [...]}); reads stdin if omitted or "-"
        file: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Analyze every event of a feed snapshot against the same records
    Triage {
        /// Snapshot JSON ({"events": [...], "existing": [...]}); reads stdin if omitted or "-"
        file: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// List every event, not just the totals
        #[arg(short, long)]
        all: bool,
    },
    /// List known calendar platforms
    Platforms,
    /// Show how a source identifier is classified
    Platform {
        source: String, // e.g. "holiday-home"
    },
    /// Show config path and effective policy
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose)?;

    let staysync = load_staysync(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze { file, json } => commands::analyze::run(&staysync, file.as_deref(), json),
        Commands::Triage { file, json, all } => {
            commands::triage::run(&staysync, file.as_deref(), json, all)
        }
        Commands::Platforms => commands::platforms::run(&staysync),
        Commands::Platform { source } => commands::platform::run(&staysync, &source),
        Commands::Config => commands::config::run(&staysync),
    }
}

fn load_staysync(config_override: Option<&str>) -> Result<Staysync> {
    let staysync = match config_override {
        Some(path) => {
            let path = Staysync::expand_path(path);
            if !path.exists() {
                anyhow::bail!("Config file '{}' not found", path.display());
            }
            Staysync::load_from(&path)?
        }
        None => Staysync::load()?,
    };

    Ok(staysync)
}
