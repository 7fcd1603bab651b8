// Mock implementations of these traits live in the per-module test code,
// which only ever awaits them on the test runtime.
#![allow(async_fn_in_trait)]

use serde::Deserialize;

use crate::models::{Booking, BookingData, Place, PlaceData};

use super::ApiError;

/// Successful response from the identity provider for both signup and login.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponseData {
    pub id_token: String,
    pub email: String,
    #[serde(default)]
    pub refresh_token: String,
    pub local_id: String,
    /// Seconds until `id_token` expires, as a decimal string.
    pub expires_in: String,
    /// Present on login only.
    #[serde(default)]
    pub registered: Option<bool>,
}

/// Result of a multipart image upload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUpload {
    pub image_url: String,
    pub image_path: String,
}

/// Token-issuing identity provider.
///
/// The session manager is generic over this seam so its lifecycle can be
/// exercised without a network.
pub trait AuthProvider: Send + Sync {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthResponseData, ApiError>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponseData, ApiError>;
}

/// REST operations on the offered-places collection.
///
/// Every call takes the bearer token resolved by the caller immediately
/// beforehand; implementations never source credentials themselves.
pub trait PlacesApi: Send + Sync {
    async fn fetch_places(&self, token: &str) -> Result<Vec<Place>, ApiError>;
    async fn fetch_place(&self, place_id: &str, token: &str) -> Result<Place, ApiError>;
    /// Create a place record, returning the backend-assigned id.
    async fn create_place(&self, data: &PlaceData, token: &str) -> Result<String, ApiError>;
    async fn update_place(
        &self,
        place_id: &str,
        data: &PlaceData,
        token: &str,
    ) -> Result<(), ApiError>;
    async fn upload_image(
        &self,
        image: Vec<u8>,
        file_name: &str,
        token: &str,
    ) -> Result<ImageUpload, ApiError>;
}

/// REST operations on the bookings collection.
pub trait BookingsApi: Send + Sync {
    /// Fetch all bookings made by `user_id`.
    async fn fetch_bookings(&self, user_id: &str, token: &str) -> Result<Vec<Booking>, ApiError>;
    async fn fetch_booking(&self, booking_id: &str, token: &str) -> Result<Booking, ApiError>;
    /// Create a booking record, returning the backend-assigned id.
    async fn create_booking(&self, data: &BookingData, token: &str) -> Result<String, ApiError>;
    async fn delete_booking(&self, booking_id: &str, token: &str) -> Result<(), ApiError>;
}
