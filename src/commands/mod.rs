pub mod analyze;
pub mod config;
pub mod platform;
pub mod platforms;
pub mod triage;
