use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A rentable place offered on the marketplace.
///
/// Identity is the backend-assigned `id`. A freshly created place carries a
/// random placeholder id until the create call returns the real one.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub price: f64,
    pub available_from: DateTime<Utc>,
    pub available_to: DateTime<Utc>,
    /// Owner of the listing.
    pub user_id: String,
    pub location: Option<PlaceLocation>,
}

/// Geocoded location attached to a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceLocation {
    pub lat: f64,
    pub lng: f64,
    pub address: Option<String>,
    #[serde(rename = "staticMapImageUrl")]
    pub static_map_image_url: Option<String>,
}

/// Wire representation of a place as stored by the backend.
///
/// The backend keys records by id, so the id itself is not part of the
/// record body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceData {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub price: f64,
    pub available_from: DateTime<Utc>,
    pub available_to: DateTime<Utc>,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<PlaceLocation>,
}

impl Place {
    /// Rehydrate a domain place from a backend record and its key.
    pub fn from_data(id: String, data: PlaceData) -> Self {
        Self {
            id,
            title: data.title,
            description: data.description,
            image_url: data.image_url,
            price: data.price,
            available_from: data.available_from,
            available_to: data.available_to,
            user_id: data.user_id,
            location: data.location,
        }
    }

    pub fn to_data(&self) -> PlaceData {
        PlaceData {
            title: self.title.clone(),
            description: self.description.clone(),
            image_url: self.image_url.clone(),
            price: self.price,
            available_from: self.available_from,
            available_to: self.available_to,
            user_id: self.user_id.clone(),
            location: self.location.clone(),
        }
    }
}
