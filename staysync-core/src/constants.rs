/// Identifier of the fallback platform profile.
pub const FALLBACK_PLATFORM: &str = "other";

/// Base date tolerance (days) applied on top of a platform's known shift.
pub const DEFAULT_DATE_TOLERANCE_DAYS: i64 = 3;

/// Tolerance (days) after subtracting a known date shift when filtering candidates.
pub const DEFAULT_CORRUPTION_TOLERANCE_DAYS: i64 = 2;

/// Tolerance (days) after subtracting a known date shift when scoring dates.
pub const DEFAULT_SHIFT_MATCH_TOLERANCE_DAYS: i64 = 1;

/// Imports closer together than this look like a race between two real bookings.
pub const DEFAULT_RACE_WINDOW_MINUTES: i64 = 10;

/// Imports this far apart look like a typical re-sync delay.
pub const DEFAULT_RESYNC_DELAY_MINUTES: i64 = 120;

pub const DEFAULT_AUTO_SKIP_THRESHOLD: f64 = 0.95;
pub const DEFAULT_FLAG_REVIEW_THRESHOLD: f64 = 0.85;

/// Decimal places kept on the final confidence before thresholding.
pub const CONFIDENCE_DECIMALS: i32 = 6;

/// Total day difference still counted as a close date match.
pub const CLOSE_DATE_DIFF_DAYS: i64 = 2;

/// Total day difference still counted as a loose date match.
pub const LOOSE_DATE_DIFF_DAYS: i64 = 4;


/// Largest date shift a platform profile may declare.
pub const MAX_DATE_SHIFT_DAYS: i64 = 366;
