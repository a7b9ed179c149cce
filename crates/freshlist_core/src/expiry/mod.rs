//! Expiration derivation from shelf-life offsets.
//!
//! # Responsibility
//! - Turn `created_at + shelf life` into one expiration instant per item.
//! - Classify a derived expiration relative to an injected "now".
//!
//! # Invariants
//! - Missing shelf life is an explicit "unknown" (`None`), never a sentinel date.
//! - Day arithmetic is calendar-based in the policy time zone.
//! - This module is pure and never logs.

pub mod calculator;
pub mod status;

pub use calculator::{
    compute_expiration, DerivedExpiration, ExpirationBasis, ExpirationError, ExpirationPolicy,
    ExpirationResult,
};
pub use status::{days_until_expiry, expiry_status, ExpiryStatus, EXPIRING_SOON_DAYS};
