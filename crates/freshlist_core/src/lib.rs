//! Expiration and temporal aggregation engine for freshlist.
//! This crate is the single source of truth for expiry invariants.

pub mod aggregate;
pub mod calendar;
pub mod expiry;
pub mod logging;
pub mod model;
pub mod service;

pub use aggregate::{
    aggregate, normalize_name, AggregateEntry, AggregateMode, AggregateOptions, AggregateResult,
    AggregatedItem, ItemView, PREVIEW_LIMIT,
};
pub use calendar::{
    build_month_grid, resolve_week, CalendarError, CalendarResult, GridCell, MonthGrid,
    WeekSelection, YearMonth,
};
pub use expiry::{
    compute_expiration, days_until_expiry, expiry_status, DerivedExpiration, ExpirationBasis,
    ExpirationError, ExpirationPolicy, ExpirationResult, ExpiryStatus,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::grocery::{GroceryItem, ItemId};
pub use service::pantry_service::{PantryService, StatusSummary, WeekView};
pub use service::snapshot::{
    decode_snapshot, SnapshotError, SnapshotResult, SnapshotTicket, SnapshotTracker,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
