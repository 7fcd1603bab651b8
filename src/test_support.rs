//! In-process fakes for the external collaborators (identity provider,
//! credential storage, entity endpoints), shared across unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;
use chrono::{Duration, Utc};

use crate::api::{
    ApiError, AuthFailureKind, AuthProvider, AuthResponseData, BookingsApi, ImageUpload, PlacesApi,
};
use crate::auth::{CredentialRecord, CredentialStore};
use crate::models::{Booking, BookingData, Place, PlaceData};

/// Route crate logs through the test-captured writer, honouring
/// `RUST_LOG`. Safe to call from every test; later calls are no-ops.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// A credential record expiring `offset` from now (negative = already expired).
pub(crate) fn expiring_record(user_id: &str, offset: Duration) -> CredentialRecord {
    CredentialRecord {
        user_id: user_id.to_string(),
        token: format!("token-{}", user_id),
        token_expiration_date: Utc::now() + offset,
        email: format!("{}@example.com", user_id),
    }
}

// ===== Credential storage =====

#[derive(Clone, Default)]
pub(crate) struct MemoryCredentialStore {
    inner: Arc<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    record: Mutex<Option<CredentialRecord>>,
    loads: AtomicUsize,
}

impl MemoryCredentialStore {
    pub fn seed(&self, record: CredentialRecord) {
        *lock(&self.inner.record) = Some(record);
    }

    pub fn stored(&self) -> Option<CredentialRecord> {
        lock(&self.inner.record).clone()
    }

    pub fn load_count(&self) -> usize {
        self.inner.loads.load(Ordering::SeqCst)
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<CredentialRecord>> {
        self.inner.loads.fetch_add(1, Ordering::SeqCst);
        Ok(lock(&self.inner.record).clone())
    }

    fn save(&self, record: &CredentialRecord) -> Result<()> {
        *lock(&self.inner.record) = Some(record.clone());
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        *lock(&self.inner.record) = None;
        Ok(())
    }
}

// ===== Identity provider =====

#[derive(Clone)]
pub(crate) struct MockAuth {
    inner: Arc<MockAuthInner>,
}

enum MockBehavior {
    Accept { user_id: String, email: String },
    Reject(AuthFailureKind),
}

struct MockAuthInner {
    behavior: MockBehavior,
    expires_in: Mutex<String>,
}

impl MockAuth {
    pub fn accept(user_id: &str, email: &str, expires_in: &str) -> Self {
        Self {
            inner: Arc::new(MockAuthInner {
                behavior: MockBehavior::Accept {
                    user_id: user_id.to_string(),
                    email: email.to_string(),
                },
                expires_in: Mutex::new(expires_in.to_string()),
            }),
        }
    }

    pub fn reject(kind: AuthFailureKind) -> Self {
        Self {
            inner: Arc::new(MockAuthInner {
                behavior: MockBehavior::Reject(kind),
                expires_in: Mutex::new("3600".to_string()),
            }),
        }
    }

    pub fn set_expires_in(&self, expires_in: &str) {
        *lock(&self.inner.expires_in) = expires_in.to_string();
    }

    fn respond(&self) -> Result<AuthResponseData, ApiError> {
        match &self.inner.behavior {
            MockBehavior::Accept { user_id, email } => Ok(AuthResponseData {
                id_token: format!("token-{}", user_id),
                email: email.clone(),
                refresh_token: "refresh".to_string(),
                local_id: user_id.clone(),
                expires_in: lock(&self.inner.expires_in).clone(),
                registered: Some(true),
            }),
            MockBehavior::Reject(kind) => Err(ApiError::AuthenticationFailed(*kind)),
        }
    }
}

impl AuthProvider for MockAuth {
    async fn sign_up(&self, _email: &str, _password: &str) -> Result<AuthResponseData, ApiError> {
        self.respond()
    }

    async fn sign_in(&self, _email: &str, _password: &str) -> Result<AuthResponseData, ApiError> {
        self.respond()
    }
}

// ===== Entity endpoints =====

/// Places endpoint fake: `remote` is what a fetch returns; mutations only
/// count calls and hand back ids, mirroring a backend that accepted them.
#[derive(Clone, Default)]
pub(crate) struct MockPlacesApi {
    inner: Arc<MockPlacesInner>,
}

#[derive(Default)]
struct MockPlacesInner {
    remote: Mutex<Vec<Place>>,
    next_id: Mutex<Option<String>>,
    fail_next: Mutex<bool>,
    fetch_calls: AtomicUsize,
    create_calls: AtomicUsize,
    update_calls: AtomicUsize,
}

impl MockPlacesApi {
    pub fn with_remote(places: Vec<Place>) -> Self {
        let api = Self::default();
        *lock(&api.inner.remote) = places;
        api
    }

    pub fn set_next_id(&self, id: &str) {
        *lock(&self.inner.next_id) = Some(id.to_string());
    }

    /// Make the next call fail with a server error.
    pub fn fail_next(&self) {
        *lock(&self.inner.fail_next) = true;
    }

    pub fn fetch_calls(&self) -> usize {
        self.inner.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.inner.create_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.inner.update_calls.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> Result<(), ApiError> {
        let mut fail = lock(&self.inner.fail_next);
        if *fail {
            *fail = false;
            return Err(ApiError::Server("injected failure".to_string()));
        }
        Ok(())
    }
}

impl PlacesApi for MockPlacesApi {
    async fn fetch_places(&self, _token: &str) -> Result<Vec<Place>, ApiError> {
        self.check_failure()?;
        self.inner.fetch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(lock(&self.inner.remote).clone())
    }

    async fn fetch_place(&self, place_id: &str, _token: &str) -> Result<Place, ApiError> {
        self.check_failure()?;
        lock(&self.inner.remote)
            .iter()
            .find(|p| p.id == place_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("place {}", place_id)))
    }

    async fn create_place(&self, _data: &PlaceData, _token: &str) -> Result<String, ApiError> {
        self.check_failure()?;
        self.inner.create_calls.fetch_add(1, Ordering::SeqCst);
        Ok(lock(&self.inner.next_id)
            .clone()
            .unwrap_or_else(|| "-Ngenerated".to_string()))
    }

    async fn update_place(
        &self,
        _place_id: &str,
        _data: &PlaceData,
        _token: &str,
    ) -> Result<(), ApiError> {
        self.check_failure()?;
        self.inner.update_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn upload_image(
        &self,
        _image: Vec<u8>,
        file_name: &str,
        _token: &str,
    ) -> Result<ImageUpload, ApiError> {
        self.check_failure()?;
        Ok(ImageUpload {
            image_url: format!("https://images.example.com/{}", file_name),
            image_path: format!("images/{}", file_name),
        })
    }
}

#[derive(Clone, Default)]
pub(crate) struct MockBookingsApi {
    inner: Arc<MockBookingsInner>,
}

#[derive(Default)]
struct MockBookingsInner {
    remote: Mutex<Vec<Booking>>,
    next_id: Mutex<Option<String>>,
    fail_next: Mutex<bool>,
    fetch_calls: AtomicUsize,
    create_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl MockBookingsApi {
    pub fn with_remote(bookings: Vec<Booking>) -> Self {
        let api = Self::default();
        *lock(&api.inner.remote) = bookings;
        api
    }

    pub fn set_next_id(&self, id: &str) {
        *lock(&self.inner.next_id) = Some(id.to_string());
    }

    pub fn fail_next(&self) {
        *lock(&self.inner.fail_next) = true;
    }

    pub fn fetch_calls(&self) -> usize {
        self.inner.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.inner.create_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.inner.delete_calls.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> Result<(), ApiError> {
        let mut fail = lock(&self.inner.fail_next);
        if *fail {
            *fail = false;
            return Err(ApiError::Server("injected failure".to_string()));
        }
        Ok(())
    }
}

impl BookingsApi for MockBookingsApi {
    async fn fetch_bookings(&self, user_id: &str, _token: &str) -> Result<Vec<Booking>, ApiError> {
        self.check_failure()?;
        self.inner.fetch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(lock(&self.inner.remote)
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn fetch_booking(&self, booking_id: &str, _token: &str) -> Result<Booking, ApiError> {
        self.check_failure()?;
        lock(&self.inner.remote)
            .iter()
            .find(|b| b.id == booking_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("booking {}", booking_id)))
    }

    async fn create_booking(&self, _data: &BookingData, _token: &str) -> Result<String, ApiError> {
        self.check_failure()?;
        self.inner.create_calls.fetch_add(1, Ordering::SeqCst);
        Ok(lock(&self.inner.next_id)
            .clone()
            .unwrap_or_else(|| "-Ngenerated".to_string()))
    }

    async fn delete_booking(&self, _booking_id: &str, _token: &str) -> Result<(), ApiError> {
        self.check_failure()?;
        self.inner.delete_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
