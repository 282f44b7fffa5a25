//! Global staysync configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{StaysyncError, StaysyncResult};
use crate::platform::PlatformConfig;
use crate::policy::EchoPolicy;

/// Global configuration at ~/.config/staysync/config.toml
///
/// `[policy]` overrides scoring weights and thresholds. Each
/// `[platforms.<id>]` table registers a new calendar source or replaces a
/// built-in profile.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct StaysyncConfig {
    #[serde(default)]
    pub policy: EchoPolicy,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub platforms: BTreeMap<String, PlatformConfig>,
}

impl StaysyncConfig {
    pub fn config_path() -> StaysyncResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| StaysyncError::Config("Could not determine config directory".into()))?
            .join("staysync");

        Ok(config_dir.join("config.toml"))
    }

    pub fn save(&self, path: &Path) -> StaysyncResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| StaysyncError::Serialization(e.to_string()))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> StaysyncResult<()> {
        let defaults = EchoPolicy::default();
        let contents = format!(
            "\
# staysync configuration

# Scoring policy (defaults shown):
# [policy]
# auto_skip_threshold = {}
# flag_review_threshold = {}
# date_tolerance_days = {}
# race_window_minutes = {}
# resync_delay_minutes = {}
#
# [policy.weights]
# date = {}
# duration = {}
# export = {}
# platform = {}
# temporal = {}

# Register a calendar source the built-in table does not know:
# [platforms.novasol]
# display_name = \"Novasol\"
# kind = \"aggregator\"
# priority = 3
# re_exports = \"unknown\"
",
            defaults.auto_skip_threshold,
            defaults.flag_review_threshold,
            defaults.date_tolerance_days,
            defaults.race_window_minutes,
            defaults.resync_delay_minutes,
            defaults.weights.date,
            defaults.weights.duration,
            defaults.weights.export,
            defaults.weights.platform,
            defaults.weights.temporal,
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;

        Ok(())
    }
}
