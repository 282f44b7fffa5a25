//! Date arithmetic over stays (check-in to check-out, counted in nights).

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};

/// A half-open span of nights: `check_in` is the first night,
/// `check_out` the morning of departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stay {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl Stay {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Self {
        Stay {
            check_in,
            check_out,
        }
    }

    /// Number of nights. Negative or zero for invalid ranges.
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Every night covered by the stay.
    pub fn night_dates(&self) -> BTreeSet<NaiveDate> {
        let mut nights = BTreeSet::new();
        let mut night = self.check_in;
        while night < self.check_out {
            nights.insert(night);
            night += Duration::days(1);
        }
        nights
    }

    /// Absolute day differences of check-in and check-out against another stay.
    pub fn day_diffs(&self, other: &Stay) -> DayDiffs {
        DayDiffs {
            check_in: (self.check_in - other.check_in).num_days().abs(),
            check_out: (self.check_out - other.check_out).num_days().abs(),
        }
    }

    /// True when `other` lies entirely within this stay.
    pub fn contains(&self, other: &Stay) -> bool {
        other.check_in >= self.check_in && other.check_out <= self.check_out
    }

    pub fn overlaps(&self, other: &Stay) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }
}

/// Absolute day differences between two stays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayDiffs {
    pub check_in: i64,
    pub check_out: i64,
}

impl DayDiffs {
    pub fn is_exact(&self) -> bool {
        self.check_in == 0 && self.check_out == 0
    }

    pub fn total(&self) -> i64 {
        self.check_in + self.check_out
    }

    pub fn within(&self, tolerance: i64) -> bool {
        self.check_in <= tolerance && self.check_out <= tolerance
    }

    /// Both differences are within `tolerance` once a systematic shift is removed.
    pub fn within_after_shift(&self, shift: i64, tolerance: i64) -> bool {
        let tolerance = tolerance.max(0).unsigned_abs();
        self.check_in.abs_diff(shift) <= tolerance && self.check_out.abs_diff(shift) <= tolerance
    }
}
