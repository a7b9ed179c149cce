//! Boundary services around the pure engine.
//!
//! # Responsibility
//! - Decode upstream snapshots and refuse stale ones.
//! - Compose engine calls into the views list/overlay UIs consume.
//! - Emit metadata-only diagnostics; engine modules stay silent.

pub mod pantry_service;
pub mod snapshot;
