//! Grocery item record.
//!
//! # Responsibility
//! - Mirror the upstream `{id, name, min_days, max_days, created_at}` shape.
//! - Offer small helpers for shelf-life presence checks.
//!
//! # Invariants
//! - `id` is stable per record and is never rewritten by the engine.
//! - `min_days`/`max_days` keep `None` distinct from `Some(0)`.
//! - `created_at` is kept verbatim so invalid input can be reported as-is.

use serde::{Deserialize, Serialize};

/// Opaque record identifier assigned by the upstream service.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type ItemId = String;

/// One grocery record as supplied by the fetch collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroceryItem {
    /// Stable upstream ID used for bulk actions (delete-selected etc.).
    pub id: ItemId,
    /// Display name. Untrusted text; may contain padding or mixed case.
    pub name: String,
    /// Lower bound of typical shelf life, in days from `created_at`.
    #[serde(default)]
    pub min_days: Option<i64>,
    /// Upper bound of typical shelf life, in days from `created_at`.
    #[serde(default)]
    pub max_days: Option<i64>,
    /// ISO-8601 creation timestamp; day zero for shelf-life arithmetic.
    pub created_at: String,
}

impl GroceryItem {
    /// Creates a record without shelf-life data.
    pub fn new(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            min_days: None,
            max_days: None,
            created_at: created_at.into(),
        }
    }

    /// Returns a copy with the given shelf-life bounds.
    pub fn with_shelf_life(mut self, min_days: Option<i64>, max_days: Option<i64>) -> Self {
        self.min_days = min_days;
        self.max_days = max_days;
        self
    }

    /// Returns whether any shelf-life bound is present at all.
    ///
    /// Presence does not imply usability: negative offsets are skipped by the
    /// calculator.
    pub fn has_shelf_life(&self) -> bool {
        self.min_days.is_some() || self.max_days.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::GroceryItem;

    #[test]
    fn new_starts_without_shelf_life() {
        let item = GroceryItem::new("a1", "Milk", "2024-01-01");
        assert_eq!(item.min_days, None);
        assert_eq!(item.max_days, None);
        assert!(!item.has_shelf_life());
    }

    #[test]
    fn with_shelf_life_keeps_zero_distinct_from_absent() {
        let item = GroceryItem::new("a1", "Milk", "2024-01-01").with_shelf_life(Some(0), None);
        assert_eq!(item.min_days, Some(0));
        assert!(item.has_shelf_life());
    }
}
