//! Session lifecycle: token acquisition, persistence, expiry-driven
//! auto-logout and silent restore.
//!
//! At most one session is active at a time. Every transition is published
//! through a watch channel, so subscribers that query state immediately
//! after a transition observe the new state. A single-shot timer forces
//! logout when the token expires; re-arming always cancels the previous
//! timer first, so at most one timer is ever pending.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::{ApiError, AuthProvider, AuthResponseData};

use super::credentials::{CredentialRecord, CredentialStore};

/// The authenticated identity bound to the current process.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_valid(&self) -> bool {
        self.expires_at > Utc::now()
    }

    /// The bearer token, or `None` once expired. Expired sessions never
    /// hand out a token, even before the auto-logout timer has fired.
    pub fn token(&self) -> Option<&str> {
        if self.is_valid() {
            Some(&self.token)
        } else {
            None
        }
    }

    /// Time left until expiry (negative when already expired).
    pub fn remaining(&self) -> Duration {
        self.expires_at - Utc::now()
    }

    fn from_record(record: CredentialRecord) -> Self {
        Self {
            user_id: record.user_id,
            email: record.email,
            token: record.token,
            expires_at: record.token_expiration_date,
        }
    }

    fn to_record(&self) -> CredentialRecord {
        CredentialRecord {
            user_id: self.user_id.clone(),
            token: self.token.clone(),
            token_expiration_date: self.expires_at,
            email: self.email.clone(),
        }
    }
}

/// Read-only projection of the current session for components that may
/// observe but never mutate it (route guard queries, entity services).
///
/// All projections read the same watched value, so they are mutually
/// consistent at any instant.
#[derive(Clone)]
pub struct SessionView {
    state: watch::Receiver<Option<Session>>,
}

impl SessionView {
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().as_ref().is_some_and(Session::is_valid)
    }

    pub fn user_id(&self) -> Option<String> {
        self.state.borrow().as_ref().map(|s| s.user_id.clone())
    }

    pub fn token(&self) -> Option<String> {
        self.state
            .borrow()
            .as_ref()
            .and_then(|s| s.token().map(str::to_string))
    }
}

struct SessionInner {
    store: Box<dyn CredentialStore>,
    state: watch::Sender<Option<Session>>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl SessionInner {
    fn lock_timer(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        match self.timer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Arm the auto-logout timer, cancelling any previously pending one.
    fn arm_auto_logout(self: &Arc<Self>, remaining: Duration) {
        let wait = remaining.to_std().unwrap_or(StdDuration::ZERO);
        let mut slot = self.lock_timer();
        if let Some(previous) = slot.take() {
            previous.abort();
        }
        // Weak handle: an abandoned manager must not be kept alive (or
        // logged out) by its own timer.
        let inner = Arc::downgrade(self);
        *slot = Some(tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            if let Some(inner) = inner.upgrade() {
                debug!("Auto-logout timer fired");
                inner.force_logout();
            }
        }));
    }

    fn force_logout(&self) {
        if let Some(pending) = self.lock_timer().take() {
            pending.abort();
        }
        let had_session = self.state.borrow().is_some();
        self.state.send_replace(None);
        // Fire-and-forget: callers never wait on storage cleanup
        if let Err(e) = self.store.remove() {
            warn!(error = %e, "Failed to remove credential record");
        }
        if had_session {
            info!("Session cleared");
        }
    }
}

impl Drop for SessionInner {
    fn drop(&mut self) {
        let slot = match self.timer.get_mut() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(pending) = slot.take() {
            pending.abort();
        }
    }
}

/// Owner of the current-user state.
///
/// Cheap to clone; all clones share the same underlying session. Only this
/// type mutates session state - everything else gets a [`SessionView`].
pub struct SessionManager<A: AuthProvider> {
    auth: Arc<A>,
    inner: Arc<SessionInner>,
}

impl<A: AuthProvider> Clone for SessionManager<A> {
    fn clone(&self) -> Self {
        Self {
            auth: Arc::clone(&self.auth),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: AuthProvider> SessionManager<A> {
    pub fn new(auth: A, store: Box<dyn CredentialStore>) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            auth: Arc::new(auth),
            inner: Arc::new(SessionInner {
                store,
                state,
                timer: Mutex::new(None),
            }),
        }
    }

    /// Exchange credentials for a token and start a session.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let data = self.auth.sign_in(email, password).await?;
        self.install(data)
    }

    /// Register a new account; a successful signup also starts a session.
    pub async fn signup(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let data = self.auth.sign_up(email, password).await?;
        self.install(data)
    }

    /// Silently restore the session from the persisted credential record.
    ///
    /// Resolves `false` - without touching current state - when no record
    /// exists, it cannot be read, or it has already expired. Failure to
    /// restore is an expected path, never an error.
    pub async fn auto_login(&self) -> bool {
        let record = match self.inner.store.load() {
            Ok(Some(record)) => record,
            Ok(None) => return false,
            Err(e) => {
                debug!(error = %e, "Could not read credential record");
                return false;
            }
        };

        let now = Utc::now();
        if record.token_expiration_date <= now {
            debug!("Stored session has already expired");
            return false;
        }

        // Re-arm for the *remaining* duration only: restoring a session
        // with 10s left must log out ~10s later, not a full period later.
        let remaining = record.token_expiration_date - now;
        let session = Session::from_record(record);
        info!(user_id = %session.user_id, "Session restored from storage");
        self.inner.state.send_replace(Some(session));
        self.inner.arm_auto_logout(remaining);
        true
    }

    /// End the current session. Idempotent: a no-op beyond timer
    /// cancellation when already logged out.
    pub fn logout(&self) {
        self.inner.force_logout();
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner
            .state
            .borrow()
            .as_ref()
            .is_some_and(Session::is_valid)
    }

    pub fn user_id(&self) -> Option<String> {
        self.inner.state.borrow().as_ref().map(|s| s.user_id.clone())
    }

    pub fn token(&self) -> Option<String> {
        self.inner
            .state
            .borrow()
            .as_ref()
            .and_then(|s| s.token().map(str::to_string))
    }

    pub fn current_session(&self) -> Option<Session> {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to session transitions (login, restore, logout, expiry).
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.inner.state.subscribe()
    }

    /// Read-only projection handed to guards and entity services.
    pub fn view(&self) -> SessionView {
        SessionView {
            state: self.inner.state.subscribe(),
        }
    }

    fn install(&self, data: AuthResponseData) -> Result<(), ApiError> {
        let seconds: i64 = data
            .expires_in
            .parse()
            .map_err(|_| ApiError::InvalidResponse(format!("expiresIn: {:?}", data.expires_in)))?;
        let lifetime = Duration::seconds(seconds);

        let session = Session {
            user_id: data.local_id,
            email: data.email,
            token: data.id_token,
            expires_at: Utc::now() + lifetime,
        };
        let record = session.to_record();
        info!(user_id = %session.user_id, "Session started");

        self.inner.state.send_replace(Some(session));
        if let Err(e) = self.inner.store.save(&record) {
            warn!(error = %e, "Failed to persist credential record");
        }
        self.inner.arm_auto_logout(lifetime);
        Ok(())
    }
}
