//! Pantry use-case service.
//!
//! # Responsibility
//! - Provide the week, preview and status-summary views used by list UIs.
//! - Accept fresh snapshots under supersession rules.
//!
//! # Invariants
//! - Every view is recomputed from the snapshot passed in.
//! - "Now" is always supplied by the caller.
//! - Logs carry IDs and counts only, never item names.

use crate::aggregate::{aggregate, AggregateMode, AggregateOptions, AggregateResult};
use crate::calendar::week::{resolve_week, WeekSelection};
use crate::calendar::CalendarResult;
use crate::expiry::calculator::{compute_expiration, ExpirationError, ExpirationPolicy};
use crate::expiry::status::{expiry_status, ExpiryStatus};
use crate::model::grocery::GroceryItem;
use crate::service::snapshot::{decode_snapshot, SnapshotResult, SnapshotTicket, SnapshotTracker};
use chrono::{DateTime, TimeZone};
use log::{info, warn};

/// Week overlay view: the resolved window and everything expiring in it.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekView<Tz: TimeZone> {
    pub week: WeekSelection<Tz>,
    pub result: AggregateResult<Tz>,
}

/// Per-status counts for dashboard badges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSummary {
    pub expired: usize,
    pub expires_today: usize,
    pub expiring_soon: usize,
    pub fresh: usize,
    pub unknown: usize,
    /// Records skipped because their timestamp was malformed.
    pub rejected: usize,
}

impl StatusSummary {
    fn record(&mut self, status: ExpiryStatus) {
        match status {
            ExpiryStatus::Expired => self.expired += 1,
            ExpiryStatus::ExpiresToday => self.expires_today += 1,
            ExpiryStatus::ExpiringSoon => self.expiring_soon += 1,
            ExpiryStatus::Fresh => self.fresh += 1,
            ExpiryStatus::Unknown => self.unknown += 1,
        }
    }
}

/// Use-case facade over the expiration engine.
pub struct PantryService<Tz: TimeZone> {
    policy: ExpirationPolicy<Tz>,
    tracker: SnapshotTracker,
    preview_limit: Option<usize>,
}

impl<Tz: TimeZone> PantryService<Tz> {
    /// Creates a service computing in the policy's time zone.
    pub fn new(policy: ExpirationPolicy<Tz>) -> Self {
        Self {
            policy,
            tracker: SnapshotTracker::new(),
            preview_limit: None,
        }
    }

    /// Overrides the preview cap (`PREVIEW_LIMIT` when unset).
    pub fn with_preview_limit(mut self, limit: usize) -> Self {
        self.preview_limit = Some(limit);
        self
    }

    pub fn policy(&self) -> &ExpirationPolicy<Tz> {
        &self.policy
    }

    /// Starts tracking one fetch; pass the ticket back to `accept_snapshot`.
    pub fn begin_fetch(&self) -> SnapshotTicket {
        self.tracker.begin()
    }

    /// Decodes a fetched payload and accepts it if no newer one won.
    ///
    /// # Errors
    /// - `Decode` when the payload is malformed; the generation is not consumed.
    /// - `Stale` when a newer snapshot was accepted first.
    pub fn accept_snapshot(
        &self,
        ticket: SnapshotTicket,
        json: &str,
    ) -> SnapshotResult<Vec<GroceryItem>> {
        let items = decode_snapshot(json).inspect_err(|err| {
            warn!(
                "event=snapshot_accept module=service status=error generation={} error={}",
                ticket.generation(),
                err
            );
        })?;
        self.tracker.accept(ticket).inspect_err(|_| {
            warn!(
                "event=snapshot_accept module=service status=stale generation={} latest={}",
                ticket.generation(),
                self.tracker.latest_accepted()
            );
        })?;
        info!(
            "event=snapshot_accept module=service status=ok generation={} items={}",
            ticket.generation(),
            items.len()
        );
        Ok(items)
    }

    /// Everything expiring in the week containing `reference`, uncapped.
    pub fn week_view(
        &self,
        items: &[GroceryItem],
        reference: &DateTime<Tz>,
        mode: AggregateMode,
    ) -> CalendarResult<WeekView<Tz>> {
        let local_reference = reference.with_timezone(self.policy.timezone());
        let week = resolve_week(&local_reference)?;
        let options = AggregateOptions::for_window(week.clone()).with_mode(mode);
        let result = aggregate(items, &self.policy, &options);
        log_aggregate("week_view", mode, &result);
        Ok(WeekView { week, result })
    }

    /// The soonest-expiring entries, capped for preview surfaces.
    pub fn preview(&self, items: &[GroceryItem], mode: AggregateMode) -> AggregateResult<Tz> {
        let mut options = AggregateOptions::preview().with_mode(mode);
        options.limit = self.preview_limit;
        let result = aggregate(items, &self.policy, &options);
        log_aggregate("preview", mode, &result);
        result
    }

    /// Counts records per freshness status relative to `now`.
    pub fn status_summary(&self, items: &[GroceryItem], now: &DateTime<Tz>) -> StatusSummary {
        let mut summary = StatusSummary::default();
        for item in items {
            match compute_expiration(item, &self.policy) {
                Ok(expiration) => summary.record(expiry_status(expiration.as_ref(), now)),
                Err(err) => {
                    log_rejected("status_summary", &err);
                    summary.rejected += 1;
                }
            }
        }
        summary
    }
}

fn log_aggregate<Tz: TimeZone>(event: &str, mode: AggregateMode, result: &AggregateResult<Tz>) {
    for err in &result.rejected {
        log_rejected(event, err);
    }
    info!(
        "event={} module=service status=ok mode={:?} matched={} returned={} unknown={} rejected={}",
        event,
        mode,
        result.matched_count,
        result.entries.len(),
        result.unknown_count,
        result.rejected.len()
    );
}

fn log_rejected(event: &str, err: &ExpirationError) {
    let reason = match err {
        ExpirationError::InvalidTimestamp { .. } => "invalid_timestamp",
        ExpirationError::OutOfRange { .. } => "out_of_range",
    };
    warn!(
        "event={} module=service status=rejected item_id={} reason={}",
        event,
        err.item_id(),
        reason
    );
}
