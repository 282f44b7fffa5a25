//! Calendar records the analyzer compares.
//!
//! `IncomingEvent` is one VEVENT freshly parsed from a remote feed by the sync
//! layer. `ExistingRecord` is anything already known for the unit: a native
//! booking or an event imported on an earlier sync.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{StaysyncError, StaysyncResult};
use crate::stay::Stay;

/// An event read from an external calendar feed during the current sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingEvent {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    /// Platform identifier of the feed (e.g. "holiday-home")
    pub source: String,
    pub imported_at: DateTime<Utc>,

    // Reporting only, never scored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// What kind of record an existing entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// A booking created by this system (direct, widget, or entered by staff)
    Booking,
    /// An event imported from some external feed on an earlier sync
    IcalEvent,
}

/// A booking or previously imported event already stored for the unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExistingRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub source: String,
    pub imported_at: DateTime<Utc>,
}

impl IncomingEvent {
    pub fn new(
        check_in: NaiveDate,
        check_out: NaiveDate,
        source: impl Into<String>,
        imported_at: DateTime<Utc>,
    ) -> Self {
        IncomingEvent {
            check_in,
            check_out,
            source: source.into(),
            imported_at,
            uid: None,
            summary: None,
        }
    }

    pub fn stay(&self) -> Stay {
        Stay::new(self.check_in, self.check_out)
    }

    /// Label used in logs and CLI output.
    pub fn label(&self) -> String {
        self.uid
            .clone()
            .or_else(|| self.summary.clone())
            .unwrap_or_else(|| format!("{}@{}", self.source, self.check_in))
    }

    /// Reject ranges the analyzer's day arithmetic is undefined for.
    pub fn validate(&self) -> StaysyncResult<()> {
        validate_range(&self.label(), self.check_in, self.check_out)
    }
}

impl ExistingRecord {
    pub fn new(
        id: impl Into<String>,
        kind: RecordKind,
        check_in: NaiveDate,
        check_out: NaiveDate,
        source: impl Into<String>,
        imported_at: DateTime<Utc>,
    ) -> Self {
        ExistingRecord {
            id: id.into(),
            kind,
            check_in,
            check_out,
            source: source.into(),
            imported_at,
        }
    }

    pub fn stay(&self) -> Stay {
        Stay::new(self.check_in, self.check_out)
    }

    pub fn is_booking(&self) -> bool {
        self.kind == RecordKind::Booking
    }

    pub fn validate(&self) -> StaysyncResult<()> {
        validate_range(&self.id, self.check_in, self.check_out)
    }
}

fn validate_range(id: &str, check_in: NaiveDate, check_out: NaiveDate) -> StaysyncResult<()> {
    if check_in >= check_out {
        return Err(StaysyncError::InvalidRecord {
            id: id.to_string(),
            reason: format!("check-in {} is not before check-out {}", check_in, check_out),
        });
    }
    Ok(())
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Booking => write!(f, "booking"),
            RecordKind::IcalEvent => write!(f, "ical_event"),
        }
    }
}

impl fmt::Display for IncomingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} → {} ({} nights)",
            self.source,
            self.check_in,
            self.check_out,
            self.stay().nights()
        )
    }
}

impl fmt::Display for ExistingRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}] {} → {}",
            self.kind, self.id, self.source, self.check_in, self.check_out
        )
    }
}
