use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::api::{ApiError, BookingsApi};
use crate::auth::SessionView;
use crate::cache::EntityCache;
use crate::models::Booking;

use super::placeholder_id;

/// Input for booking a place. The booking user is always the current
/// session user; place details are denormalized into the record so the
/// bookings list renders without extra lookups.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub place_id: String,
    pub place_title: String,
    pub place_image: String,
    pub first_name: String,
    pub last_name: String,
    pub guest_number: u32,
    pub booked_from: DateTime<Utc>,
    pub booked_to: DateTime<Utc>,
    pub price: f64,
}

/// CRUD orchestration for the current user's bookings.
pub struct BookingService<A: BookingsApi> {
    api: A,
    session: SessionView,
    cache: EntityCache<Booking>,
}

impl<A: BookingsApi> BookingService<A> {
    pub fn new(api: A, session: SessionView) -> Self {
        Self {
            api,
            session,
            cache: EntityCache::new(),
        }
    }

    /// Subscribe to booking snapshots; emits the full snapshot on every change.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Booking>> {
        self.cache.subscribe()
    }

    pub fn snapshot(&self) -> Vec<Booking> {
        self.cache.snapshot()
    }

    pub fn is_populated(&self) -> bool {
        self.cache.is_populated()
    }

    fn token(&self) -> Result<String, ApiError> {
        self.session.token().ok_or(ApiError::Unauthorized)
    }

    fn identity(&self) -> Result<(String, String), ApiError> {
        let user_id = self.session.user_id().ok_or(ApiError::Unauthorized)?;
        let token = self.token()?;
        Ok((user_id, token))
    }

    /// Fetch all bookings made by the current user, replacing the snapshot.
    pub async fn fetch_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        let (user_id, token) = self.identity()?;
        let bookings = self.api.fetch_bookings(&user_id, &token).await?;
        self.cache.replace(bookings.clone());
        Ok(bookings)
    }

    /// Fetch a single booking without touching the cache.
    pub async fn fetch_booking(&self, booking_id: &str) -> Result<Booking, ApiError> {
        let token = self.token()?;
        self.api.fetch_booking(booking_id, &token).await
    }

    /// Book a place. Appended to the snapshot only after the backend
    /// confirms and assigns the real id.
    pub async fn add_booking(&self, new_booking: NewBooking) -> Result<Booking, ApiError> {
        let (user_id, token) = self.identity()?;
        let mut booking = Booking {
            id: placeholder_id(),
            place_id: new_booking.place_id,
            user_id,
            place_title: new_booking.place_title,
            place_image: new_booking.place_image,
            first_name: new_booking.first_name,
            last_name: new_booking.last_name,
            guest_number: new_booking.guest_number,
            booked_from: new_booking.booked_from,
            booked_to: new_booking.booked_to,
            price: new_booking.price,
        };

        let generated_id = self.api.create_booking(&booking.to_data(), &token).await?;
        booking.id = generated_id;
        self.cache.append(booking.clone());
        Ok(booking)
    }

    /// Cancel a booking; removed from the snapshot once the backend
    /// confirms the delete.
    pub async fn cancel_booking(&self, booking_id: &str) -> Result<(), ApiError> {
        let token = self.token()?;
        self.api.delete_booking(booking_id, &token).await?;
        self.cache.remove(|b| b.id == booking_id);
        Ok(())
    }
}
