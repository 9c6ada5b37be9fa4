//! In-memory compound store and index helpers.

/// Mass and formula index structures.
pub mod indices;
/// Read-only indexed compound store.
pub mod store;
