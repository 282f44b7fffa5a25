//! Loaded staysync configuration: the effective policy and platform registry.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use tracing::debug;

use crate::echo::EchoAnalyzer;
use crate::error::{StaysyncError, StaysyncResult};
use crate::platform::PlatformRegistry;
use crate::policy::EchoPolicy;
use crate::staysync_config::StaysyncConfig;

#[derive(Debug, Clone)]
pub struct Staysync {
    config: StaysyncConfig,
    registry: PlatformRegistry,
    config_path: PathBuf,
}

impl Staysync {
    /// Load ~/.config/staysync/config.toml, creating a commented default on
    /// first use.
    pub fn load() -> StaysyncResult<Self> {
        Self::load_from(&StaysyncConfig::config_path()?)
    }

    /// Load from an explicit path. `STAYSYNC_*` environment variables
    /// override file values (e.g. `STAYSYNC_POLICY__AUTO_SKIP_THRESHOLD`).
    pub fn load_from(config_path: &Path) -> StaysyncResult<Self> {
        if !config_path.exists() {
            StaysyncConfig::create_default_config(config_path)?;
        }

        let config: StaysyncConfig = Config::builder()
            .add_source(File::from(config_path).required(false))
            .add_source(
                Environment::with_prefix("STAYSYNC")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| StaysyncError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| StaysyncError::Config(e.to_string()))?;

        config.policy.validate()?;
        for (id, platform) in &config.platforms {
            platform.validate(id)?;
        }

        let registry = PlatformRegistry::builtin().with_overrides(config.platforms.clone());

        debug!(
            path = %config_path.display(),
            platform_overrides = config.platforms.len(),
            "loaded configuration"
        );

        Ok(Staysync {
            config,
            registry,
            config_path: config_path.to_path_buf(),
        })
    }

    /// Expand `~` in a user-supplied path.
    pub fn expand_path(raw: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(raw).into_owned())
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn config(&self) -> &StaysyncConfig {
        &self.config
    }

    pub fn policy(&self) -> &EchoPolicy {
        &self.config.policy
    }

    pub fn registry(&self) -> &PlatformRegistry {
        &self.registry
    }

    /// An analyzer using this configuration's registry and policy.
    pub fn analyzer(&self) -> EchoAnalyzer<'_> {
        EchoAnalyzer::new(&self.registry, self.config.policy.clone())
    }
}
