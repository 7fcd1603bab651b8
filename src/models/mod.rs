//! Data models for marketplace entities.
//!
//! Each entity comes in two shapes:
//!
//! - a domain type (`Place`, `Booking`) carrying the backend-assigned id
//! - a wire type (`PlaceData`, `BookingData`) matching the camelCase JSON
//!   record body, keyed by id on the backend

pub mod booking;
pub mod place;

pub use booking::{Booking, BookingData};
pub use place::{Place, PlaceData, PlaceLocation};
