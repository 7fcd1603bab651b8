//! REST client for the hosted backend.
//!
//! `ApiClient` is the production implementation of the [`AuthProvider`],
//! [`PlacesApi`] and [`BookingsApi`] seams. It speaks three endpoints:
//!
//! - the identity provider (`accounts:signUp` / `accounts:signInWithPassword`)
//! - the entity store, which keys records by id and returns
//!   `{"name": <generated id>}` on create
//! - the multipart image upload function
//!
//! The bearer token travels as the `auth` query parameter on entity calls,
//! which is the credential format the backend expects.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::{header, multipart, Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::models::{Booking, BookingData, Place, PlaceData};

use super::{ApiError, AuthProvider, AuthResponseData, BookingsApi, ImageUpload, PlacesApi};

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

/// Create responses carry the generated record id in a `name` field.
#[derive(Debug, Deserialize)]
struct NameResponse {
    name: String,
}

/// API client for the Wanderstay backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: Config,
}

impl ApiClient {
    pub fn new(config: Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, config })
    }

    fn auth_url(&self, operation: &str) -> String {
        format!(
            "{}/accounts:{}?key={}",
            self.config.auth_base_url, operation, self.config.api_key
        )
    }

    fn entity_url(&self, path: &str) -> String {
        format!("{}/{}.json", self.config.database_url, path)
    }

    async fn authenticate(
        &self,
        operation: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponseData, ApiError> {
        let response = self
            .client
            .post(self.auth_url(operation))
            .json(&AuthRequest {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_auth_status(status, &body));
        }

        let data: AuthResponseData = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("auth response: {}", e)))?;
        debug!(operation, "Identity provider call succeeded");
        Ok(data)
    }

    /// Check if response is successful, returning a classified error if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn parse_json<T: serde::de::DeserializeOwned>(
        response: Response,
        what: &str,
    ) -> Result<T, ApiError> {
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", what, e)))
    }
}

impl AuthProvider for ApiClient {
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthResponseData, ApiError> {
        self.authenticate("signUp", email, password).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponseData, ApiError> {
        self.authenticate("signInWithPassword", email, password)
            .await
    }
}

impl PlacesApi for ApiClient {
    async fn fetch_places(&self, token: &str) -> Result<Vec<Place>, ApiError> {
        let response = self
            .client
            .get(self.entity_url("offered-places"))
            .query(&[("auth", token)])
            .send()
            .await?;
        let response = Self::check_response(response).await?;

        // The store returns `null` for an empty collection, otherwise a map
        // keyed by record id.
        let records: Option<BTreeMap<String, PlaceData>> =
            Self::parse_json(response, "places").await?;
        let places: Vec<Place> = records
            .unwrap_or_default()
            .into_iter()
            .map(|(id, data)| Place::from_data(id, data))
            .collect();
        debug!(count = places.len(), "Fetched offered places");
        Ok(places)
    }

    async fn fetch_place(&self, place_id: &str, token: &str) -> Result<Place, ApiError> {
        let response = self
            .client
            .get(self.entity_url(&format!("offered-places/{}", place_id)))
            .query(&[("auth", token)])
            .send()
            .await?;
        let response = Self::check_response(response).await?;

        let data: Option<PlaceData> = Self::parse_json(response, "place").await?;
        match data {
            Some(data) => Ok(Place::from_data(place_id.to_string(), data)),
            None => Err(ApiError::NotFound(format!("place {}", place_id))),
        }
    }

    async fn create_place(&self, data: &PlaceData, token: &str) -> Result<String, ApiError> {
        let response = self
            .client
            .post(self.entity_url("offered-places"))
            .query(&[("auth", token)])
            .json(data)
            .send()
            .await?;
        let response = Self::check_response(response).await?;

        let created: NameResponse = Self::parse_json(response, "create place").await?;
        debug!(id = %created.name, "Created place");
        Ok(created.name)
    }

    async fn update_place(
        &self,
        place_id: &str,
        data: &PlaceData,
        token: &str,
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .put(self.entity_url(&format!("offered-places/{}", place_id)))
            .query(&[("auth", token)])
            .json(data)
            .send()
            .await?;
        Self::check_response(response).await?;
        debug!(id = place_id, "Updated place");
        Ok(())
    }

    async fn upload_image(
        &self,
        image: Vec<u8>,
        file_name: &str,
        token: &str,
    ) -> Result<ImageUpload, ApiError> {
        let part = multipart::Part::bytes(image)
            .file_name(file_name.to_string())
            .mime_str("image/jpeg")?;
        let form = multipart::Form::new().part("image", part);

        let response = self
            .client
            .post(&self.config.image_upload_url)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .multipart(form)
            .send()
            .await?;
        let response = Self::check_response(response).await?;
        Self::parse_json(response, "image upload").await
    }
}

impl BookingsApi for ApiClient {
    async fn fetch_bookings(&self, user_id: &str, token: &str) -> Result<Vec<Booking>, ApiError> {
        // Server-side filter: only bookings made by this user.
        let response = self
            .client
            .get(self.entity_url("bookings"))
            .query(&[
                ("orderBy", "\"userId\""),
                ("equalTo", &format!("\"{}\"", user_id)),
                ("auth", token),
            ])
            .send()
            .await?;
        let response = Self::check_response(response).await?;

        let records: Option<BTreeMap<String, BookingData>> =
            Self::parse_json(response, "bookings").await?;
        let bookings: Vec<Booking> = records
            .unwrap_or_default()
            .into_iter()
            .map(|(id, data)| Booking::from_data(id, data))
            .collect();
        debug!(count = bookings.len(), "Fetched bookings");
        Ok(bookings)
    }

    async fn fetch_booking(&self, booking_id: &str, token: &str) -> Result<Booking, ApiError> {
        let response = self
            .client
            .get(self.entity_url(&format!("bookings/{}", booking_id)))
            .query(&[("auth", token)])
            .send()
            .await?;
        let response = Self::check_response(response).await?;

        let data: Option<BookingData> = Self::parse_json(response, "booking").await?;
        match data {
            Some(data) => Ok(Booking::from_data(booking_id.to_string(), data)),
            None => Err(ApiError::NotFound(format!("booking {}", booking_id))),
        }
    }

    async fn create_booking(&self, data: &BookingData, token: &str) -> Result<String, ApiError> {
        let response = self
            .client
            .post(self.entity_url("bookings"))
            .query(&[("auth", token)])
            .json(data)
            .send()
            .await?;
        let response = Self::check_response(response).await?;

        let created: NameResponse = Self::parse_json(response, "create booking").await?;
        debug!(id = %created.name, "Created booking");
        Ok(created.name)
    }

    async fn delete_booking(&self, booking_id: &str, token: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.entity_url(&format!("bookings/{}", booking_id)))
            .query(&[("auth", token)])
            .send()
            .await?;
        Self::check_response(response).await?;
        debug!(id = booking_id, "Deleted booking");
        Ok(())
    }
}
