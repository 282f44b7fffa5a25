//! Platform registry.
//!
//! Classifies calendar-source identifiers into behavioral profiles: whether a
//! platform only exports its own bookings (authoritative) or may re-publish
//! calendars it imported (aggregator), and whether it is known to corrupt
//! dates on the way out.
//!
//! Lookups are total. Anything not registered resolves to the "other"
//! profile, so classification never fails for an unrecognized source.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::constants::{FALLBACK_PLATFORM, MAX_DATE_SHIFT_DAYS};
use crate::error::{StaysyncError, StaysyncResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    /// Only ever exports its own native bookings
    Authoritative,
    /// May re-export calendar data it previously imported
    Aggregator,
}

/// Whether a platform is proven to re-publish imported events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReExports {
    Yes,
    No,
    Unknown,
}

/// Behavioral profile of one calendar source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformConfig {
    pub display_name: String,
    pub kind: PlatformKind,
    /// Lower is more trusted (0 = native bookings)
    pub priority: u8,
    pub re_exports: ReExports,
    #[serde(default)]
    pub has_date_corruption: bool,
    #[serde(default)]
    pub date_shift_days: i64,
    /// Query parameter that suppresses re-export of imported events, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opt_out_param: Option<String>,
}

impl PlatformConfig {
    fn builtin(
        display_name: &str,
        kind: PlatformKind,
        priority: u8,
        re_exports: ReExports,
        date_shift_days: i64,
    ) -> Self {
        PlatformConfig {
            display_name: display_name.to_string(),
            kind,
            priority,
            re_exports,
            has_date_corruption: date_shift_days != 0,
            date_shift_days,
            opt_out_param: None,
        }
    }

    pub fn is_aggregator(&self) -> bool {
        self.kind == PlatformKind::Aggregator
    }

    pub fn is_authoritative(&self) -> bool {
        self.kind == PlatformKind::Authoritative
    }

    pub fn has_opt_out(&self) -> bool {
        self.opt_out_param.is_some()
    }

    /// Check a profile loaded from configuration. `id` names it in errors.
    pub fn validate(&self, id: &str) -> StaysyncResult<()> {
        if !(0..=MAX_DATE_SHIFT_DAYS).contains(&self.date_shift_days) {
            return Err(StaysyncError::Config(format!(
                "platform '{id}': date_shift_days must be within 0..={MAX_DATE_SHIFT_DAYS}, got {}",
                self.date_shift_days
            )));
        }

        if self.has_date_corruption != (self.date_shift_days != 0) {
            return Err(StaysyncError::Config(format!(
                "platform '{id}': has_date_corruption = {} contradicts date_shift_days = {}",
                self.has_date_corruption, self.date_shift_days
            )));
        }

        Ok(())
    }

    /// Known date shift, or zero when the platform does not corrupt dates.
    pub fn known_shift(&self) -> i64 {
        if self.has_date_corruption {
            self.date_shift_days
        } else {
            0
        }
    }
}

/// Lookup table from source identifier to platform profile.
#[derive(Debug, Clone)]
pub struct PlatformRegistry {
    platforms: BTreeMap<String, PlatformConfig>,
}

static BUILTIN: LazyLock<PlatformRegistry> = LazyLock::new(PlatformRegistry::builtin);

impl PlatformRegistry {
    /// The compiled-in table.
    pub fn builtin() -> Self {
        use PlatformKind::{Aggregator, Authoritative};

        let entries = [
            ("direct", PlatformConfig::builtin("Direct", Authoritative, 0, ReExports::No, 0)),
            ("widget", PlatformConfig::builtin("Booking widget", Authoritative, 0, ReExports::No, 0)),
            ("booking_com", PlatformConfig::builtin("Booking.com", Authoritative, 1, ReExports::No, 0)),
            ("airbnb", PlatformConfig::builtin("Airbnb", Authoritative, 1, ReExports::No, 0)),
            ("adriagate", PlatformConfig::builtin("Adriagate", Aggregator, 2, ReExports::Yes, 0)),
            ("atraveo", PlatformConfig::builtin("Atraveo", Aggregator, 2, ReExports::Unknown, 0)),
            ("holiday-home", PlatformConfig::builtin("Holiday-Home", Aggregator, 3, ReExports::Yes, 29)),
            (FALLBACK_PLATFORM, PlatformConfig::builtin("Other", Aggregator, 5, ReExports::Unknown, 0)),
        ];

        PlatformRegistry {
            platforms: entries
                .into_iter()
                .map(|(id, config)| (id.to_string(), config))
                .collect(),
        }
    }

    /// Merge overrides over this registry. An override replaces the built-in
    /// profile of the same identifier, or registers a new one.
    pub fn with_overrides(mut self, overrides: BTreeMap<String, PlatformConfig>) -> Self {
        for (id, config) in overrides {
            self.platforms.insert(normalize_source(&id), config);
        }
        self
    }

    /// Profile for `source`, falling back to "other".
    pub fn get(&self, source: &str) -> &PlatformConfig {
        self.lookup(source).unwrap_or_else(|| self.fallback())
    }

    /// Profile for `source` only if it is registered.
    pub fn lookup(&self, source: &str) -> Option<&PlatformConfig> {
        self.platforms.get(&normalize_source(source))
    }

    pub fn is_registered(&self, source: &str) -> bool {
        self.lookup(source).is_some()
    }

    pub fn is_aggregator(&self, source: &str) -> bool {
        self.get(source).is_aggregator()
    }

    pub fn is_authoritative(&self, source: &str) -> bool {
        self.get(source).is_authoritative()
    }

    /// Registered platforms, most trusted first.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PlatformConfig)> {
        let mut entries: Vec<_> = self
            .platforms
            .iter()
            .map(|(id, config)| (id.as_str(), config))
            .collect();
        entries.sort_by_key(|(id, config)| (config.priority, *id));
        entries.into_iter()
    }

    fn fallback(&self) -> &PlatformConfig {
        match self.platforms.get(FALLBACK_PLATFORM) {
            Some(config) => config,
            // Overrides may replace "other" but never remove it
            None => BUILTIN.fallback(),
        }
    }
}

impl Default for PlatformRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// The process-wide built-in registry.
pub fn builtin_registry() -> &'static PlatformRegistry {
    &BUILTIN
}

pub fn get_platform_config(source: &str) -> &'static PlatformConfig {
    BUILTIN.get(source)
}

pub fn is_aggregator(source: &str) -> bool {
    BUILTIN.is_aggregator(source)
}

pub fn is_authoritative(source: &str) -> bool {
    BUILTIN.is_authoritative(source)
}

/// Canonical form of a source identifier.
pub fn normalize_source(source: &str) -> String {
    source.trim().to_lowercase()
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformKind::Authoritative => write!(f, "authoritative"),
            PlatformKind::Aggregator => write!(f, "aggregator"),
        }
    }
}

impl fmt::Display for ReExports {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReExports::Yes => write!(f, "yes"),
            ReExports::No => write!(f, "no"),
            ReExports::Unknown => write!(f, "unknown"),
        }
    }
}
