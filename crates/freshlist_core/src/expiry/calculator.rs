//! Expiration calculator.
//!
//! # Responsibility
//! - Parse the raw `created_at` text of a record.
//! - Select the authoritative shelf-life offset (`max_days` over `min_days`).
//! - Add calendar days while respecting month/year rollover and DST.
//!
//! # Invariants
//! - `max_days` wins whenever it is present and non-negative.
//! - Negative offsets are unusable and fall through to the next rule.
//! - An unparseable `created_at` is an error; it is never coerced to "now".

use crate::model::grocery::{GroceryItem, ItemId};
use chrono::{
    DateTime, Days, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone,
};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Offset-less datetime layouts accepted for `created_at`.
// `%#z` takes `Z`, `+HH`, `+HHMM` and `+HH:MM`; `%.f` may be empty.
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
];
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];
const DATE_FORMAT: &str = "%Y-%m-%d";

pub type ExpirationResult<T> = Result<T, ExpirationError>;

/// Per-item failure while deriving an expiration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpirationError {
    /// `created_at` does not parse to a valid instant.
    InvalidTimestamp { id: ItemId, raw: String },
    /// `created_at + days` leaves the representable date range.
    OutOfRange { id: ItemId, days: u64 },
}

impl ExpirationError {
    /// Returns the ID of the record that failed.
    pub fn item_id(&self) -> &str {
        match self {
            Self::InvalidTimestamp { id, .. } | Self::OutOfRange { id, .. } => id,
        }
    }
}

impl Display for ExpirationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTimestamp { id, raw } => {
                write!(f, "item `{id}` has unparseable created_at `{raw}`")
            }
            Self::OutOfRange { id, days } => {
                write!(f, "item `{id}` expiration is out of range (+{days} days)")
            }
        }
    }
}

impl Error for ExpirationError {}

/// Which shelf-life bound produced an expiration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpirationBasis {
    /// Derived from `max_days`; treated as the known expiry offset.
    MaxDays,
    /// Derived from `min_days` only; a rough estimate without upper bound.
    MinDaysEstimate,
}

impl ExpirationBasis {
    /// Returns whether callers should flag this expiration as an estimate.
    pub fn is_estimate(self) -> bool {
        matches!(self, Self::MinDaysEstimate)
    }
}

/// Derived expiration instant plus the bound it came from.
///
/// Ordering and window filtering only look at `at`.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedExpiration<Tz: TimeZone> {
    pub at: DateTime<Tz>,
    pub basis: ExpirationBasis,
}

/// Calendar context for expiration arithmetic.
///
/// The time zone decides what "local midnight" and "N days later" mean; the
/// engine never reads a process-wide zone on its own.
#[derive(Debug, Clone)]
pub struct ExpirationPolicy<Tz: TimeZone> {
    tz: Tz,
}

impl<Tz: TimeZone> ExpirationPolicy<Tz> {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn timezone(&self) -> &Tz {
        &self.tz
    }

    /// Parses raw `created_at` text into an instant in the policy zone.
    ///
    /// Accepts RFC 3339, ISO 8601 datetimes with a basic or hour-only offset,
    /// offset-less datetimes (read as local wall time) and
    /// plain dates (read as local midnight). Returns `None` for anything else.
    pub fn parse_created_at(&self, raw: &str) -> Option<DateTime<Tz>> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
            return Some(parsed.with_timezone(&self.tz));
        }
        for format in OFFSET_DATETIME_FORMATS {
            if let Ok(parsed) = DateTime::parse_from_str(trimmed, format) {
                return Some(parsed.with_timezone(&self.tz));
            }
        }
        for format in NAIVE_DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
                return resolve_local(&self.tz, naive);
            }
        }
        let date = NaiveDate::parse_from_str(trimmed, DATE_FORMAT).ok()?;
        resolve_local(&self.tz, date.and_time(NaiveTime::MIN))
    }

    /// Moves `from` by `days` calendar days, keeping the local wall time.
    ///
    /// Returns `None` when the result is outside chrono's date range.
    pub fn add_days(&self, from: &DateTime<Tz>, days: u64) -> Option<DateTime<Tz>> {
        let shifted = from.naive_local().checked_add_days(Days::new(days))?;
        resolve_local(&self.tz, shifted)
    }

    /// Returns the first instant of `date` in the policy zone.
    pub fn start_of_day(&self, date: NaiveDate) -> Option<DateTime<Tz>> {
        resolve_local(&self.tz, date.and_time(NaiveTime::MIN))
    }
}

/// Maps a local wall time onto an instant.
///
/// Ambiguous times (DST fall-back) resolve to the earlier instant. Times that
/// fall into a DST gap are read with the offset in effect at that UTC moment,
/// which lands just past the gap.
pub(crate) fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(value) => Some(value),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => {
            let offset = tz.offset_from_utc_datetime(&naive).fix();
            let utc = naive.checked_sub_signed(Duration::seconds(i64::from(
                offset.local_minus_utc(),
            )))?;
            Some(tz.from_utc_datetime(&utc))
        }
    }
}

/// Computes the expiration of one record.
///
/// Returns `Ok(None)` when no usable shelf-life offset exists.
///
/// # Errors
/// - `InvalidTimestamp` when `created_at` cannot be parsed.
/// - `OutOfRange` when the offset pushes past the representable range.
pub fn compute_expiration<Tz: TimeZone>(
    item: &GroceryItem,
    policy: &ExpirationPolicy<Tz>,
) -> ExpirationResult<Option<DerivedExpiration<Tz>>> {
    let created_at =
        policy
            .parse_created_at(&item.created_at)
            .ok_or_else(|| ExpirationError::InvalidTimestamp {
                id: item.id.clone(),
                raw: item.created_at.clone(),
            })?;

    let Some((days, basis)) = select_offset(item) else {
        return Ok(None);
    };

    let at = policy
        .add_days(&created_at, days)
        .ok_or_else(|| ExpirationError::OutOfRange {
            id: item.id.clone(),
            days,
        })?;
    Ok(Some(DerivedExpiration { at, basis }))
}

fn select_offset(item: &GroceryItem) -> Option<(u64, ExpirationBasis)> {
    if let Some(days) = usable_days(item.max_days) {
        return Some((days, ExpirationBasis::MaxDays));
    }
    usable_days(item.min_days).map(|days| (days, ExpirationBasis::MinDaysEstimate))
}

fn usable_days(value: Option<i64>) -> Option<u64> {
    value.and_then(|days| u64::try_from(days).ok())
}
