//! Authentication: session lifecycle, credential persistence, route
//! guarding and resume-time revalidation.
//!
//! This module provides:
//! - `SessionManager`: token-based session state with auto-logout and
//!   silent restore
//! - `CredentialStore`: durable storage for the credential record
//!   (OS keychain or file backed)
//! - `RouteGuard`: gate for protected navigation
//! - `LifecycleObserver`: foreground-transition session revalidation

pub mod credentials;
pub mod guard;
pub mod lifecycle;
pub mod session;

pub use credentials::{CredentialRecord, CredentialStore, FileCredentialStore, KeyringCredentialStore};
pub use guard::{GuardDecision, RouteGuard};
pub use lifecycle::{AppState, LifecycleObserver};
pub use session::{Session, SessionManager, SessionView};
