//! Item aggregator.
//!
//! Pipeline order is fixed: validate, dedupe/group, filter by window, sort,
//! truncate.

use crate::calendar::week::WeekSelection;
use crate::expiry::calculator::{
    compute_expiration, DerivedExpiration, ExpirationError, ExpirationPolicy,
};
use crate::model::grocery::{GroceryItem, ItemId};
use chrono::TimeZone;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Default cap for unfiltered preview views.
pub const PREVIEW_LIMIT: usize = 3;

/// How records sharing a normalized name are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggregateMode {
    /// Every valid record is its own entry.
    #[default]
    Flat,
    /// First-encountered record per name; later duplicates are dropped.
    Deduplicated,
    /// One `AggregatedItem` per name with count, ids and earliest expiration.
    Grouped,
}

/// Caller options for one aggregation pass.
#[derive(Debug, Clone)]
pub struct AggregateOptions<Tz: TimeZone> {
    /// Keep only entries expiring inside this week.
    ///
    /// In `Grouped` mode membership is decided by the group's earliest
    /// expiration, so a group whose earliest member falls before the week is
    /// dropped even when later members fall inside it.
    pub window: Option<WeekSelection<Tz>>,
    /// Explicit cap. Without a window the cap defaults to `PREVIEW_LIMIT`.
    pub limit: Option<usize>,
    pub mode: AggregateMode,
}

impl<Tz: TimeZone> Default for AggregateOptions<Tz> {
    fn default() -> Self {
        Self {
            window: None,
            limit: None,
            mode: AggregateMode::default(),
        }
    }
}

impl<Tz: TimeZone> AggregateOptions<Tz> {
    /// Unfiltered preview capped at `PREVIEW_LIMIT`.
    pub fn preview() -> Self {
        Self::default()
    }

    /// Complete, uncapped set of entries expiring inside `window`.
    pub fn for_window(window: WeekSelection<Tz>) -> Self {
        Self {
            window: Some(window),
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: AggregateMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn effective_limit(&self) -> Option<usize> {
        match (&self.window, self.limit) {
            (_, Some(limit)) => Some(limit),
            (None, None) => Some(PREVIEW_LIMIT),
            (Some(_), None) => None,
        }
    }
}

/// One record together with its derived expiration.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemView<Tz: TimeZone> {
    pub item: GroceryItem,
    pub expiration: Option<DerivedExpiration<Tz>>,
}

/// Records sharing one normalized name.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedItem<Tz: TimeZone> {
    /// Normalized grouping key (trimmed, lowercase).
    pub key: String,
    /// Trimmed display name of the first-encountered member.
    pub name: String,
    /// Earliest expiration among members, `None` if no member has one.
    pub expiration: Option<DerivedExpiration<Tz>>,
    pub count: usize,
    /// Member IDs in input order.
    pub ids: Vec<ItemId>,
}

/// A display entry produced by `aggregate`.
#[derive(Debug, Clone, PartialEq)]
pub enum AggregateEntry<Tz: TimeZone> {
    Item(ItemView<Tz>),
    Group(AggregatedItem<Tz>),
}

impl<Tz: TimeZone> AggregateEntry<Tz> {
    pub fn expiration(&self) -> Option<&DerivedExpiration<Tz>> {
        match self {
            Self::Item(view) => view.expiration.as_ref(),
            Self::Group(group) => group.expiration.as_ref(),
        }
    }

    /// Display name (trimmed for groups, verbatim for single records).
    pub fn name(&self) -> &str {
        match self {
            Self::Item(view) => &view.item.name,
            Self::Group(group) => &group.name,
        }
    }

    /// Number of underlying records.
    pub fn count(&self) -> usize {
        match self {
            Self::Item(_) => 1,
            Self::Group(group) => group.count,
        }
    }

    /// IDs of the underlying records.
    pub fn ids(&self) -> Vec<&str> {
        match self {
            Self::Item(view) => vec![view.item.id.as_str()],
            Self::Group(group) => group.ids.iter().map(String::as_str).collect(),
        }
    }
}

/// Output of one aggregation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult<Tz: TimeZone> {
    /// Ranked entries after filtering and truncation.
    pub entries: Vec<AggregateEntry<Tz>>,
    /// Records excluded as malformed, in input order.
    pub rejected: Vec<ExpirationError>,
    /// Entries without a derivable expiration before truncation.
    pub unknown_count: usize,
    /// Entries that passed filtering before truncation.
    pub matched_count: usize,
}

impl<Tz: TimeZone> AggregateResult<Tz> {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether truncation dropped matching entries.
    pub fn is_truncated(&self) -> bool {
        self.matched_count > self.entries.len()
    }
}

/// Normalizes a display name into its grouping key.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Builds a ranked view of `items` under `options`.
///
/// Never fails: an empty snapshot yields an empty result, and records with an
/// unparseable `created_at` land in `rejected`.
pub fn aggregate<Tz: TimeZone>(
    items: &[GroceryItem],
    policy: &ExpirationPolicy<Tz>,
    options: &AggregateOptions<Tz>,
) -> AggregateResult<Tz> {
    let (views, rejected) = derive_views(items, policy);

    let mut entries = match options.mode {
        AggregateMode::Flat => views.into_iter().map(AggregateEntry::Item).collect(),
        AggregateMode::Deduplicated => dedupe_first(views),
        AggregateMode::Grouped => group_by_name(views),
    };

    if let Some(window) = &options.window {
        entries.retain(|entry| {
            entry
                .expiration()
                .is_some_and(|expiration| window.contains(&expiration.at))
        });
    }

    // `sort_by` is stable; equal keys keep input order.
    entries.sort_by(|left, right| compare_expiration(left.expiration(), right.expiration()));

    let unknown_count = entries
        .iter()
        .filter(|entry| entry.expiration().is_none())
        .count();
    let matched_count = entries.len();
    if let Some(limit) = options.effective_limit() {
        entries.truncate(limit);
    }

    AggregateResult {
        entries,
        rejected,
        unknown_count,
        matched_count,
    }
}

fn derive_views<Tz: TimeZone>(
    items: &[GroceryItem],
    policy: &ExpirationPolicy<Tz>,
) -> (Vec<ItemView<Tz>>, Vec<ExpirationError>) {
    let mut views = Vec::with_capacity(items.len());
    let mut rejected = Vec::new();
    for item in items {
        match compute_expiration(item, policy) {
            Ok(expiration) => views.push(ItemView {
                item: item.clone(),
                expiration,
            }),
            Err(err) => rejected.push(err),
        }
    }
    (views, rejected)
}

fn dedupe_first<Tz: TimeZone>(views: Vec<ItemView<Tz>>) -> Vec<AggregateEntry<Tz>> {
    let mut seen = HashSet::<String>::new();
    views
        .into_iter()
        .filter(|view| seen.insert(normalize_name(&view.item.name)))
        .map(AggregateEntry::Item)
        .collect()
}

fn group_by_name<Tz: TimeZone>(views: Vec<ItemView<Tz>>) -> Vec<AggregateEntry<Tz>> {
    let mut positions = HashMap::<String, usize>::new();
    let mut groups: Vec<AggregatedItem<Tz>> = Vec::new();

    for view in views {
        let key = normalize_name(&view.item.name);
        match positions.get(&key) {
            Some(&index) => {
                let group = &mut groups[index];
                group.count += 1;
                group.ids.push(view.item.id);
                if compare_expiration(view.expiration.as_ref(), group.expiration.as_ref())
                    == Ordering::Less
                {
                    group.expiration = view.expiration;
                }
            }
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push(AggregatedItem {
                    key,
                    name: view.item.name.trim().to_string(),
                    expiration: view.expiration,
                    count: 1,
                    ids: vec![view.item.id],
                });
            }
        }
    }

    groups.into_iter().map(AggregateEntry::Group).collect()
}

/// Known expirations first (earliest first), unknown last.
fn compare_expiration<Tz: TimeZone>(
    left: Option<&DerivedExpiration<Tz>>,
    right: Option<&DerivedExpiration<Tz>>,
) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.at.cmp(&right.at),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
