use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A confirmed reservation of a place for a date range.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub id: String,
    pub place_id: String,
    /// The user who made the booking.
    pub user_id: String,
    pub place_title: String,
    pub place_image: String,
    pub first_name: String,
    pub last_name: String,
    pub guest_number: u32,
    pub booked_from: DateTime<Utc>,
    pub booked_to: DateTime<Utc>,
    pub price: f64,
}

/// Wire representation of a booking record (id lives in the record key).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingData {
    pub place_id: String,
    pub user_id: String,
    pub place_title: String,
    pub place_image: String,
    pub first_name: String,
    pub last_name: String,
    pub guest_number: u32,
    pub booked_from: DateTime<Utc>,
    pub booked_to: DateTime<Utc>,
    pub price: f64,
}

impl Booking {
    pub fn from_data(id: String, data: BookingData) -> Self {
        Self {
            id,
            place_id: data.place_id,
            user_id: data.user_id,
            place_title: data.place_title,
            place_image: data.place_image,
            first_name: data.first_name,
            last_name: data.last_name,
            guest_number: data.guest_number,
            booked_from: data.booked_from,
            booked_to: data.booked_to,
            price: data.price,
        }
    }

    pub fn to_data(&self) -> BookingData {
        BookingData {
            place_id: self.place_id.clone(),
            user_id: self.user_id.clone(),
            place_title: self.place_title.clone(),
            place_image: self.place_image.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            guest_number: self.guest_number,
            booked_from: self.booked_from,
            booked_to: self.booked_to,
            price: self.price,
        }
    }
}
