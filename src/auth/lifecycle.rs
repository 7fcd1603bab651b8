use tracing::info;

use crate::api::AuthProvider;

use super::session::SessionManager;

/// Platform application state, as reported by the host shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Active,
    Background,
}

/// Revalidates the session when the app returns to the foreground.
///
/// No timer fires while the process is suspended, so a session can expire
/// unnoticed in the background. On resume, an authenticated session is
/// checked against the persisted record; if the silent restore fails, the
/// session is forcibly ended.
pub struct LifecycleObserver<A: AuthProvider> {
    sessions: SessionManager<A>,
}

impl<A: AuthProvider> LifecycleObserver<A> {
    pub fn new(sessions: SessionManager<A>) -> Self {
        Self { sessions }
    }

    pub async fn on_state_change(&self, state: AppState) {
        if state == AppState::Active {
            self.on_resume().await;
        }
    }

    /// Validation round-trip on foreground transition.
    pub async fn on_resume(&self) {
        if !self.sessions.is_authenticated() {
            return;
        }
        if !self.sessions.auto_login().await {
            info!("Session no longer valid after resume, logging out");
            self.sessions.logout();
        }
    }
}
