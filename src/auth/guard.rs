use tracing::debug;

use crate::api::AuthProvider;

use super::session::SessionManager;

/// Outcome of a protected-route check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectToLogin,
}

impl GuardDecision {
    pub fn allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

/// Gate for protected navigation.
///
/// An already-authenticated session passes straight through. Otherwise a
/// single silent-restore attempt decides; there is no retry, so the check
/// always completes as one bounded async operation.
pub struct RouteGuard<A: AuthProvider> {
    sessions: SessionManager<A>,
}

impl<A: AuthProvider> RouteGuard<A> {
    pub fn new(sessions: SessionManager<A>) -> Self {
        Self { sessions }
    }

    pub async fn check(&self) -> GuardDecision {
        if self.sessions.is_authenticated() {
            return GuardDecision::Allow;
        }
        if self.sessions.auto_login().await {
            GuardDecision::Allow
        } else {
            debug!("Navigation denied, redirecting to login");
            GuardDecision::RedirectToLogin
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{expiring_record, init_tracing, MemoryCredentialStore, MockAuth};
    use chrono::Duration;

    fn guard_with(store: &MemoryCredentialStore) -> (RouteGuard<MockAuth>, SessionManager<MockAuth>) {
        init_tracing();
        let manager = SessionManager::new(
            MockAuth::accept("u1", "x@y.com", "3600"),
            Box::new(store.clone()),
        );
        (RouteGuard::new(manager.clone()), manager)
    }

    #[tokio::test(start_paused = true)]
    async fn authenticated_session_allows_without_touching_storage() {
        let store = MemoryCredentialStore::default();
        let (guard, manager) = guard_with(&store);
        manager.login("x@y.com", "pw").await.unwrap();

        let loads_before = store.load_count();
        assert_eq!(guard.check().await, GuardDecision::Allow);
        // No silent-restore attempt was made
        assert_eq!(store.load_count(), loads_before);
    }

    #[tokio::test(start_paused = true)]
    async fn valid_stored_record_restores_and_allows() {
        let store = MemoryCredentialStore::default();
        store.seed(expiring_record("u1", Duration::seconds(600)));
        let (guard, manager) = guard_with(&store);

        assert_eq!(guard.check().await, GuardDecision::Allow);
        assert!(manager.is_authenticated());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_restore_redirects_to_login() {
        let store = MemoryCredentialStore::default();
        let (guard, manager) = guard_with(&store);

        let decision = guard.check().await;
        assert_eq!(decision, GuardDecision::RedirectToLogin);
        assert!(!decision.allowed());
        assert!(!manager.is_authenticated());
        // Exactly one restore attempt, not retried
        assert_eq!(store.load_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_stored_record_redirects_to_login() {
        let store = MemoryCredentialStore::default();
        store.seed(expiring_record("u1", Duration::seconds(-1)));
        let (guard, _manager) = guard_with(&store);
        assert_eq!(guard.check().await, GuardDecision::RedirectToLogin);
    }
}
