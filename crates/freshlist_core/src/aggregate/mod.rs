//! Collection-level views over grocery snapshots.
//!
//! # Responsibility
//! - Combine per-item expirations into ranked, filtered display sequences.
//! - Group duplicate records by normalized name for bulk actions.
//!
//! # Invariants
//! - Every call is a full recomputation from the given snapshot.
//! - Malformed records are reported, never sorted.
//! - Sorting is stable; unknown expirations sort last.

pub mod aggregator;

pub use aggregator::{
    aggregate, normalize_name, AggregateEntry, AggregateMode, AggregateOptions, AggregateResult,
    AggregatedItem, ItemView, PREVIEW_LIMIT,
};
