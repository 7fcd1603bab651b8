//! REST API surface for the hosted backend.
//!
//! The external endpoints (identity provider, entity store, image upload)
//! are modelled as traits so the session manager and entity services can be
//! exercised against in-process fakes. `ApiClient` is the production
//! implementation over HTTPS.

pub mod client;
pub mod error;
pub mod traits;

pub use client::ApiClient;
pub use error::{ApiError, AuthFailureKind};
pub use traits::{AuthProvider, AuthResponseData, BookingsApi, ImageUpload, PlacesApi};
