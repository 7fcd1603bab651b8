//! Wanderstay client core - session and entity state for a place-booking
//! marketplace.
//!
//! This crate keeps an application's client-side state in sync with its
//! hosted REST backend: token-based sessions with auto-logout and silent
//! restore, navigation guarding, resume-time revalidation, and per-entity
//! caches that broadcast full snapshots to any number of subscribers.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod models;
pub mod services;

#[cfg(test)]
mod test_support;

pub use api::{ApiClient, ApiError};
pub use auth::{GuardDecision, LifecycleObserver, RouteGuard, SessionManager};
pub use cache::EntityCache;
pub use config::Config;
pub use services::{BookingService, PlaceService};
