//! Grocery domain model consumed by the expiration engine.
//!
//! # Responsibility
//! - Define the externally supplied record shape the engine reads.
//! - Keep the wire format identical to the upstream JSON snapshot.
//!
//! # Invariants
//! - Records are immutable from the engine's perspective.
//! - Raw `created_at` text is preserved; parsing happens in `expiry`.

pub mod grocery;
