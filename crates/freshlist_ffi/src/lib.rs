//! Flutter-facing bindings for the freshlist engine.

pub mod api;
