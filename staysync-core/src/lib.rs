//! Core of staysync: decides whether an event imported from an external
//! rental calendar is an echo of a booking we exported ourselves.
//!
//! - `platform` classifies calendar sources into behavioral profiles
//! - `echo` scores an incoming event against the records known for a unit
//! - `policy` holds the weights, thresholds and windows the scoring uses
//! - `staysync` loads the global configuration (policy and registry overrides)

pub mod constants;
pub mod echo;
pub mod error;
pub mod platform;
pub mod policy;
pub mod record;
pub mod stay;
pub mod staysync;
pub mod staysync_config;

pub use echo::{EchoAnalyzer, EchoMatchResult, RecommendedAction, analyze_event};
pub use error::{StaysyncError, StaysyncResult};
pub use platform::{
    PlatformConfig, PlatformKind, PlatformRegistry, ReExports, get_platform_config,
    is_aggregator, is_authoritative,
};
pub use policy::EchoPolicy;
pub use record::{ExistingRecord, IncomingEvent, RecordKind};
