//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose engine operations to Dart via FRB as sync, plain-data calls.
//! - Convert epoch milliseconds to and from the device time zone.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Failures are reported in response envelopes, never thrown.
//! - "Now" and reference instants always come from the caller.

use chrono::{DateTime, Local, TimeZone};
use freshlist_core::{
    aggregate, build_month_grid, compute_expiration, core_version as core_version_inner,
    expiry_status, init_logging as init_logging_inner, ping as ping_inner, AggregateEntry,
    AggregateMode, AggregateOptions, ExpirationPolicy, GridCell, GroceryItem, PantryService,
    SnapshotTicket, WeekSelection, YearMonth, PREVIEW_LIMIT,
};
use log::warn;
use std::sync::OnceLock;

const PREVIEW_LIMIT_MAX: u32 = 50;
const PREVIEW_LIMIT_ENV: &str = "FRESHLIST_PREVIEW_LIMIT";
static PREVIEW_LIMIT_CONFIG: OnceLock<u32> = OnceLock::new();
static PANTRY_SERVICE: OnceLock<PantryService<Local>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Grocery record as received from the upstream HTTP collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FfiGroceryItem {
    pub id: String,
    pub name: String,
    pub min_days: Option<i64>,
    pub max_days: Option<i64>,
    /// Raw ISO-8601 text; validated by core.
    pub created_at: String,
}

impl From<FfiGroceryItem> for GroceryItem {
    fn from(value: FfiGroceryItem) -> Self {
        GroceryItem::new(value.id, value.name, value.created_at)
            .with_shelf_life(value.min_days, value.max_days)
    }
}

impl From<GroceryItem> for FfiGroceryItem {
    fn from(value: GroceryItem) -> Self {
        Self {
            id: value.id,
            name: value.name,
            min_days: value.min_days,
            max_days: value.max_days,
            created_at: value.created_at,
        }
    }
}

/// Derived expiration envelope for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpirationResponse {
    /// `false` only when `created_at` is malformed.
    pub ok: bool,
    /// `None` for unknown expiration.
    pub expires_at_epoch_ms: Option<i64>,
    /// Derived from `min_days` only.
    pub is_estimate: bool,
    /// `expired|expires_today|expiring_soon|fresh|unknown`.
    pub status: String,
    pub message: String,
}

/// Resolved week envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekResponse {
    pub ok: bool,
    pub start_epoch_ms: i64,
    pub end_epoch_ms: i64,
    pub label: String,
    pub message: String,
}

/// Month grid envelope; `cells` uses `0` for blanks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGridResponse {
    pub ok: bool,
    pub cells: Vec<u32>,
    /// Cell indices inside the highlighted week, if one was requested.
    pub highlighted: Vec<u32>,
    pub message: String,
}

/// One ranked entry of an aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateItemView {
    pub name: String,
    pub ids: Vec<String>,
    pub count: u32,
    pub expires_at_epoch_ms: Option<i64>,
    pub is_estimate: bool,
    pub status: String,
}

/// Aggregation envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateResponse {
    pub ok: bool,
    pub items: Vec<AggregateItemView>,
    /// IDs of records dropped for malformed timestamps.
    pub rejected_ids: Vec<String>,
    pub unknown_count: u32,
    pub matched_count: u32,
    /// Label of the applied week window, if any.
    pub window_label: Option<String>,
    pub message: String,
}

impl AggregateResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            items: Vec::new(),
            rejected_ids: Vec::new(),
            unknown_count: 0,
            matched_count: 0,
            window_label: None,
            message: message.into(),
        }
    }
}

/// Snapshot acceptance envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotResponse {
    pub ok: bool,
    pub items: Vec<FfiGroceryItem>,
    pub message: String,
}

/// Computes one item's expiration in the device time zone.
///
/// # FFI contract
/// - Sync, pure computation.
/// - Never panics; malformed `created_at` yields `ok=false`.
#[flutter_rust_bridge::frb(sync)]
pub fn expiration_for_item(item: FfiGroceryItem, now_epoch_ms: i64) -> ExpirationResponse {
    let Some(now) = local_instant(now_epoch_ms) else {
        return ExpirationResponse {
            ok: false,
            expires_at_epoch_ms: None,
            is_estimate: false,
            status: String::new(),
            message: format!("invalid now_epoch_ms: {now_epoch_ms}"),
        };
    };
    let item = GroceryItem::from(item);
    match compute_expiration(&item, pantry_service().policy()) {
        Ok(expiration) => ExpirationResponse {
            ok: true,
            expires_at_epoch_ms: expiration.as_ref().map(|value| value.at.timestamp_millis()),
            is_estimate: expiration
                .as_ref()
                .is_some_and(|value| value.basis.is_estimate()),
            status: expiry_status(expiration.as_ref(), &now).to_string(),
            message: String::new(),
        },
        Err(err) => ExpirationResponse {
            ok: false,
            expires_at_epoch_ms: None,
            is_estimate: false,
            status: String::new(),
            message: format!("expiration_for_item failed: {err}"),
        },
    }
}

/// Resolves the Sunday-first week containing `reference_epoch_ms`.
#[flutter_rust_bridge::frb(sync)]
pub fn resolve_week(reference_epoch_ms: i64) -> WeekResponse {
    match local_week(reference_epoch_ms) {
        Ok(week) => WeekResponse {
            ok: true,
            start_epoch_ms: week.start().timestamp_millis(),
            end_epoch_ms: week.end().timestamp_millis(),
            label: week.label().to_string(),
            message: String::new(),
        },
        Err(message) => WeekResponse {
            ok: false,
            start_epoch_ms: 0,
            end_epoch_ms: 0,
            label: String::new(),
            message,
        },
    }
}

/// Builds the 42-cell month grid, optionally highlighting one week.
#[flutter_rust_bridge::frb(sync)]
pub fn build_month_grid_for(
    year: i32,
    month: u32,
    highlight_reference_ms: Option<i64>,
) -> MonthGridResponse {
    let failure = |message: String| MonthGridResponse {
        ok: false,
        cells: Vec::new(),
        highlighted: Vec::new(),
        message,
    };
    let year_month = match YearMonth::new(year, month) {
        Ok(value) => value,
        Err(err) => return failure(format!("build_month_grid failed: {err}")),
    };
    let grid = build_month_grid(year_month);
    let highlighted = match highlight_reference_ms.map(local_week).transpose() {
        Ok(week) => week
            .map(|week| {
                grid.cells_in_week(&week)
                    .into_iter()
                    .map(|index| index as u32)
                    .collect()
            })
            .unwrap_or_default(),
        Err(message) => return failure(message),
    };

    MonthGridResponse {
        ok: true,
        cells: grid
            .cells()
            .iter()
            .map(|cell| match cell {
                GridCell::Day(day) => *day,
                GridCell::Blank => 0,
            })
            .collect(),
        highlighted,
        message: String::new(),
    }
}

/// Aggregates a snapshot for list and overlay surfaces.
///
/// Input semantics:
/// - `week_reference_ms`: when set, only entries expiring in that week are
///   returned and the preview cap is lifted.
/// - `limit`: explicit cap; `0` or `None` falls back to the configured preview
///   limit for unfiltered calls.
/// - `mode`: `flat|deduplicated|grouped`.
#[flutter_rust_bridge::frb(sync)]
pub fn aggregate_items(
    items: Vec<FfiGroceryItem>,
    now_epoch_ms: i64,
    week_reference_ms: Option<i64>,
    limit: Option<u32>,
    mode: String,
) -> AggregateResponse {
    let Some(now) = local_instant(now_epoch_ms) else {
        return AggregateResponse::failure(format!("invalid now_epoch_ms: {now_epoch_ms}"));
    };
    let mode = match parse_mode(&mode) {
        Ok(mode) => mode,
        Err(message) => return AggregateResponse::failure(message),
    };

    let mut options = match week_reference_ms.map(local_week).transpose() {
        Ok(Some(week)) => AggregateOptions::for_window(week),
        Ok(None) => AggregateOptions::preview(),
        Err(message) => return AggregateResponse::failure(message),
    };
    options.mode = mode;
    options.limit = match (options.window.is_some(), limit) {
        (true, None | Some(0)) => None,
        (_, explicit) => Some(normalize_preview_limit(explicit) as usize),
    };

    let records = items.into_iter().map(GroceryItem::from).collect::<Vec<_>>();
    let result = aggregate(&records, pantry_service().policy(), &options);
    if !result.rejected.is_empty() {
        warn!(
            "event=aggregate_items module=ffi status=partial rejected={}",
            result.rejected.len()
        );
    }

    let message = if result.entries.is_empty() {
        "No matching groceries.".to_string()
    } else {
        format!("Found {} entr(ies).", result.entries.len())
    };
    AggregateResponse {
        ok: true,
        items: result
            .entries
            .iter()
            .map(|entry| to_item_view(entry, &now))
            .collect(),
        rejected_ids: result
            .rejected
            .iter()
            .map(|err| err.item_id().to_string())
            .collect(),
        unknown_count: result.unknown_count as u32,
        matched_count: result.matched_count as u32,
        window_label: options.window.as_ref().map(|week| week.label().to_string()),
        message,
    }
}

/// Starts a snapshot fetch and returns its generation token.
#[flutter_rust_bridge::frb(sync)]
pub fn begin_snapshot_fetch() -> u64 {
    pantry_service().begin_fetch().generation()
}

/// Decodes a fetched JSON snapshot unless a newer one was already accepted.
#[flutter_rust_bridge::frb(sync)]
pub fn accept_snapshot(generation: u64, json: String) -> SnapshotResponse {
    let ticket = SnapshotTicket::from_generation(generation);
    match pantry_service().accept_snapshot(ticket, &json) {
        Ok(items) => SnapshotResponse {
            ok: true,
            message: format!("Accepted {} item(s).", items.len()),
            items: items.into_iter().map(FfiGroceryItem::from).collect(),
        },
        Err(err) => SnapshotResponse {
            ok: false,
            items: Vec::new(),
            message: format!("accept_snapshot failed: {err}"),
        },
    }
}

fn pantry_service() -> &'static PantryService<Local> {
    PANTRY_SERVICE.get_or_init(|| {
        PantryService::new(ExpirationPolicy::new(Local))
            .with_preview_limit(configured_preview_limit() as usize)
    })
}

fn configured_preview_limit() -> u32 {
    *PREVIEW_LIMIT_CONFIG.get_or_init(|| {
        let raw = std::env::var(PREVIEW_LIMIT_ENV).ok();
        let parsed = raw.and_then(|value| value.trim().parse::<u32>().ok());
        clamp_limit(parsed)
    })
}

fn normalize_preview_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => configured_preview_limit(),
        explicit => clamp_limit(explicit),
    }
}

fn clamp_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => PREVIEW_LIMIT as u32,
        Some(value) if value > PREVIEW_LIMIT_MAX => PREVIEW_LIMIT_MAX,
        Some(value) => value,
    }
}

fn parse_mode(raw: &str) -> Result<AggregateMode, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "flat" => Ok(AggregateMode::Flat),
        "deduplicated" | "dedupe" => Ok(AggregateMode::Deduplicated),
        "grouped" | "group" => Ok(AggregateMode::Grouped),
        other => Err(format!(
            "unsupported aggregate mode `{other}`; expected flat|deduplicated|grouped"
        )),
    }
}

fn local_instant(epoch_ms: i64) -> Option<DateTime<Local>> {
    Local.timestamp_millis_opt(epoch_ms).single()
}

fn local_week(epoch_ms: i64) -> Result<WeekSelection<Local>, String> {
    let reference =
        local_instant(epoch_ms).ok_or_else(|| format!("invalid reference epoch ms: {epoch_ms}"))?;
    freshlist_core::resolve_week(&reference).map_err(|err| format!("resolve_week failed: {err}"))
}

fn to_item_view(entry: &AggregateEntry<Local>, now: &DateTime<Local>) -> AggregateItemView {
    let expiration = entry.expiration();
    AggregateItemView {
        name: entry.name().to_string(),
        ids: entry.ids().into_iter().map(str::to_string).collect(),
        count: entry.count() as u32,
        expires_at_epoch_ms: expiration.map(|value| value.at.timestamp_millis()),
        is_estimate: expiration.is_some_and(|value| value.basis.is_estimate()),
        status: expiry_status(expiration, now).to_string(),
    }
}
