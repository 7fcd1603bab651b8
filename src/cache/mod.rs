//! Reactive in-memory caching for remote collections.
//!
//! Each entity service owns one `EntityCache` holding the latest known
//! snapshot of its collection. Successful mutations update the snapshot in
//! place (append / remove / replace) so the UI never needs a full re-fetch
//! to stay consistent.

pub mod store;

pub use store::EntityCache;
