use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::debug;

use crate::api::{ApiError, ImageUpload, PlacesApi};
use crate::auth::SessionView;
use crate::cache::EntityCache;
use crate::models::{Place, PlaceLocation};

use super::placeholder_id;

/// Input for offering a new place. The image must already have been
/// uploaded (see [`PlaceService::upload_image`]); only the resulting URL is
/// stored with the listing.
#[derive(Debug, Clone)]
pub struct NewPlace {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub price: f64,
    pub available_from: DateTime<Utc>,
    pub available_to: DateTime<Utc>,
    pub location: Option<PlaceLocation>,
}

/// CRUD orchestration for offered places, keeping the local snapshot in
/// sync with every confirmed mutation.
pub struct PlaceService<A: PlacesApi> {
    api: A,
    session: SessionView,
    cache: EntityCache<Place>,
}

impl<A: PlacesApi> PlaceService<A> {
    pub fn new(api: A, session: SessionView) -> Self {
        Self {
            api,
            session,
            cache: EntityCache::new(),
        }
    }

    /// Subscribe to place snapshots; emits the full snapshot on every change.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Place>> {
        self.cache.subscribe()
    }

    pub fn snapshot(&self) -> Vec<Place> {
        self.cache.snapshot()
    }

    /// False until the first successful fetch or confirmed mutation; an
    /// empty unpopulated snapshot means "not loaded", not "no listings".
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

    /// Full fetch, replacing the cached snapshot.
    pub async fn fetch_places(&self) -> Result<Vec<Place>, ApiError> {
        let token = self.token()?;
        let places = self.api.fetch_places(&token).await?;
        self.cache.replace(places.clone());
        Ok(places)
    }

    /// Fetch a single place without touching the cache.
    pub async fn fetch_place(&self, place_id: &str) -> Result<Place, ApiError> {
        let token = self.token()?;
        self.api.fetch_place(place_id, &token).await
    }

    /// Offer a new place. Appended to the snapshot only after the backend
    /// confirms and assigns the real id.
    pub async fn add_place(&self, new_place: NewPlace) -> Result<Place, ApiError> {
        let (user_id, token) = self.identity()?;
        let mut place = Place {
            id: placeholder_id(),
            title: new_place.title,
            description: new_place.description,
            image_url: new_place.image_url,
            price: new_place.price,
            available_from: new_place.available_from,
            available_to: new_place.available_to,
            user_id,
            location: new_place.location,
        };

        let generated_id = self.api.create_place(&place.to_data(), &token).await?;
        place.id = generated_id;
        self.cache.append(place.clone());
        Ok(place)
    }

    /// Edit title and description of an owned listing.
    ///
    /// An update is a read-modify-write against the cached snapshot, so a
    /// cold cache forces exactly one full fetch first - never a positional
    /// write against an empty or stale snapshot.
    pub async fn update_place(
        &self,
        place_id: &str,
        title: String,
        description: String,
    ) -> Result<Place, ApiError> {
        let token = self.token()?;

        if !self.cache.is_populated() {
            debug!("Cold cache before update, fetching places first");
            let places = self.api.fetch_places(&token).await?;
            self.cache.replace(places);
        }

        let existing = self
            .cache
            .snapshot()
            .into_iter()
            .find(|p| p.id == place_id)
            .ok_or_else(|| ApiError::NotFound(format!("place {}", place_id)))?;

        let updated = Place {
            title,
            description,
            ..existing
        };
        self.api
            .update_place(place_id, &updated.to_data(), &token)
            .await?;
        self.cache.replace_where(|p| p.id == place_id, updated.clone());
        Ok(updated)
    }

    /// Upload a listing photo, returning its served URL and storage path.
    pub async fn upload_image(
        &self,
        image: Vec<u8>,
        file_name: &str,
    ) -> Result<ImageUpload, ApiError> {
        let token = self.token()?;
        self.api.upload_image(image, file_name, &token).await
    }
}
