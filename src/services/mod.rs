//! Entity services: REST orchestration plus cache synchronization.
//!
//! Each service owns its entity cache and is the only writer to it. Every
//! mutating operation resolves the session token first (failing fast with
//! `Unauthorized` when there is none), issues the REST call, and only
//! applies the matching cache operation after the backend confirmed - the
//! cache is never updated optimistically.

pub mod bookings;
pub mod places;

pub use bookings::{BookingService, NewBooking};
pub use places::{NewPlace, PlaceService};

/// Random pre-confirmation id. Only a correlation token: the backend
/// assigns the real id on create and the placeholder is overwritten before
/// the record enters the cache.
pub(crate) fn placeholder_id() -> String {
    format!("tmp-{:016x}", rand::random::<u64>())
}
