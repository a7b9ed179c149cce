//! Snapshot decoding and supersession tracking.
//!
//! # Responsibility
//! - Decode the upstream JSON array into `GroceryItem` records.
//! - Issue generation tickets so a slower, older fetch cannot overwrite a
//!   newer snapshot.
//!
//! # Invariants
//! - Accepted generations are strictly increasing.
//! - A ticket is accepted at most once.

use crate::model::grocery::GroceryItem;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};

pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Snapshot boundary error.
#[derive(Debug)]
pub enum SnapshotError {
    /// Payload is not a JSON array of grocery records.
    Decode(serde_json::Error),
    /// A newer snapshot has already been accepted.
    Stale { generation: u64, latest: u64 },
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode(err) => write!(f, "invalid grocery snapshot: {err}"),
            Self::Stale { generation, latest } => write!(
                f,
                "snapshot generation {generation} is stale; latest accepted is {latest}"
            ),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Decode(err) => Some(err),
            Self::Stale { .. } => None,
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value)
    }
}

/// Decodes one upstream snapshot.
pub fn decode_snapshot(json: &str) -> SnapshotResult<Vec<GroceryItem>> {
    Ok(serde_json::from_str(json)?)
}

/// Generation token handed to a fetch when it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotTicket(u64);

impl SnapshotTicket {
    /// Rebuilds a ticket from a generation number carried across FFI.
    pub fn from_generation(generation: u64) -> Self {
        Self(generation)
    }

    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Lock-free supersession tracker shared by concurrent fetches.
#[derive(Debug, Default)]
pub struct SnapshotTracker {
    issued: AtomicU64,
    applied: AtomicU64,
}

impl SnapshotTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the ticket for a fetch that is about to start.
    pub fn begin(&self) -> SnapshotTicket {
        SnapshotTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Marks `ticket` as the current snapshot unless a newer one won.
    ///
    /// # Errors
    /// - `Stale` when an equal or newer generation was already accepted.
    pub fn accept(&self, ticket: SnapshotTicket) -> SnapshotResult<()> {
        let previous = self.applied.fetch_max(ticket.0, Ordering::SeqCst);
        if previous < ticket.0 {
            Ok(())
        } else {
            Err(SnapshotError::Stale {
                generation: ticket.0,
                latest: previous,
            })
        }
    }

    /// Latest accepted generation, `0` before the first snapshot.
    pub fn latest_accepted(&self) -> u64 {
        self.applied.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::{SnapshotError, SnapshotTracker};

    #[test]
    fn begin_issues_increasing_generations() {
        let tracker = SnapshotTracker::new();
        let first = tracker.begin();
        let second = tracker.begin();
        assert!(second > first);
        assert_eq!(first.generation(), 1);
    }

    #[test]
    fn accept_rejects_same_ticket_twice() {
        let tracker = SnapshotTracker::new();
        let ticket = tracker.begin();
        tracker.accept(ticket).unwrap();
        assert!(matches!(
            tracker.accept(ticket),
            Err(SnapshotError::Stale { generation: 1, latest: 1 })
        ));
    }

    #[test]
    fn tracker_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<SnapshotTracker>();
    }
}
