//! Freshness classification relative to an injected "now".

use crate::expiry::calculator::DerivedExpiration;
use chrono::{DateTime, TimeZone};
use std::fmt::{Display, Formatter};

/// Expirations within this many local days (excluding today) are "soon".
pub const EXPIRING_SOON_DAYS: i64 = 2;

/// Badge-level freshness state for list surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpiryStatus {
    /// Expiration instant is already in the past.
    Expired,
    /// Expires later on the same local day.
    ExpiresToday,
    /// Expires within `EXPIRING_SOON_DAYS` local days.
    ExpiringSoon,
    /// Expires after the soon horizon.
    Fresh,
    /// No derivable expiration.
    Unknown,
}

impl ExpiryStatus {
    /// Stable snake_case label used across the FFI boundary.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Expired => "expired",
            Self::ExpiresToday => "expires_today",
            Self::ExpiringSoon => "expiring_soon",
            Self::Fresh => "fresh",
            Self::Unknown => "unknown",
        }
    }
}

impl Display for ExpiryStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the number of local calendar days from `now` to the expiration.
///
/// `0` means today; negative values mean the expiration day has passed.
pub fn days_until_expiry<Tz: TimeZone>(
    expiration: &DerivedExpiration<Tz>,
    now: &DateTime<Tz>,
) -> i64 {
    (expiration.at.date_naive() - now.date_naive()).num_days()
}

/// Classifies an optional expiration against `now`.
pub fn expiry_status<Tz: TimeZone>(
    expiration: Option<&DerivedExpiration<Tz>>,
    now: &DateTime<Tz>,
) -> ExpiryStatus {
    let Some(expiration) = expiration else {
        return ExpiryStatus::Unknown;
    };
    if expiration.at < *now {
        return ExpiryStatus::Expired;
    }
    match days_until_expiry(expiration, now) {
        0 => ExpiryStatus::ExpiresToday,
        days if days <= EXPIRING_SOON_DAYS => ExpiryStatus::ExpiringSoon,
        _ => ExpiryStatus::Fresh,
    }
}
