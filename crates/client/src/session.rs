//! Authenticated session shared by every client built from one `StoreApi`.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use secrecy::{ExposeSecret, SecretString};
use shopfront_core::User;

/// Access token plus the profile fetched with it.
#[derive(Debug)]
pub struct AuthSession {
    id: u64,
    access_token: SecretString,
    profile: Option<User>,
}

#[derive(Debug, Default)]
struct SessionState {
    current: Option<AuthSession>,
    next_id: u64,
}

/// Shared holder for the current [`AuthSession`].
///
/// Cloning yields a handle to the same session. Requests to the API origin
/// read the token from here, so a fresh login is picked up without callers
/// passing the token around.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<SessionState>>,
}

impl SessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new session with `token`, dropping any cached profile.
    pub fn start(&self, token: SecretString) {
        let mut state = self.write();
        let id = state.next_id;
        state.next_id += 1;
        state.current = Some(AuthSession {
            id,
            access_token: token,
            profile: None,
        });
    }

    /// Discard the session.
    pub fn clear(&self) {
        self.write().current = None;
    }

    /// Whether a token is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read().current.is_some()
    }

    /// Identifier of the current session; changes on every [`SessionStore::start`].
    #[must_use]
    pub fn session_id(&self) -> Option<u64> {
        self.read().current.as_ref().map(|session| session.id)
    }

    /// A copy of the current access token.
    #[must_use]
    pub fn access_token(&self) -> Option<SecretString> {
        self.read()
            .current
            .as_ref()
            .map(|session| SecretString::from(session.access_token.expose_secret().to_owned()))
    }

    /// Cache `profile` if session `session_id` is still the current one.
    ///
    /// Returns `false` when the session was cleared or replaced while the
    /// profile was being fetched; the profile is then dropped.
    pub fn cache_profile(&self, session_id: u64, profile: User) -> bool {
        match self.write().current.as_mut() {
            Some(session) if session.id == session_id => {
                session.profile = Some(profile);
                true
            }
            _ => false,
        }
    }

    /// The cached profile, if one was fetched for this session.
    #[must_use]
    pub fn profile(&self) -> Option<User> {
        self.read()
            .current
            .as_ref()
            .and_then(|session| session.profile.clone())
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::{Email, UserId};

    use super::*;

    fn user() -> User {
        User {
            id: UserId::new(7),
            email: Email::parse("a@b.com").unwrap(),
            name: "carlos".to_string(),
            role: None,
            avatar: None,
        }
    }

    #[test]
    fn test_start_and_clear() {
        let store = SessionStore::new();
        assert!(!store.is_authenticated());
        assert!(store.access_token().is_none());

        store.start(SecretString::from("tok-1".to_string()));
        assert!(store.is_authenticated());
        assert_eq!(store.access_token().unwrap().expose_secret(), "tok-1");

        store.clear();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_new_session_drops_profile() {
        let store = SessionStore::new();
        store.start(SecretString::from("tok-1".to_string()));
        assert!(store.cache_profile(store.session_id().unwrap(), user()));
        assert_eq!(store.profile(), Some(user()));

        store.start(SecretString::from("tok-2".to_string()));
        assert!(store.profile().is_none());
        assert_eq!(store.access_token().unwrap().expose_secret(), "tok-2");
    }

    #[test]
    fn test_profile_ignored_without_session() {
        let store = SessionStore::new();
        assert!(!store.cache_profile(0, user()));
        assert!(store.profile().is_none());
    }

    #[test]
    fn test_profile_for_replaced_session_is_dropped() {
        let store = SessionStore::new();
        store.start(SecretString::from("tok-1".to_string()));
        let first = store.session_id().unwrap();

        store.start(SecretString::from("tok-2".to_string()));
        assert_ne!(store.session_id(), Some(first));

        assert!(!store.cache_profile(first, user()));
        assert!(store.profile().is_none());
    }

    #[test]
    fn test_profile_after_logout_is_dropped() {
        let store = SessionStore::new();
        store.start(SecretString::from("tok-1".to_string()));
        let id = store.session_id().unwrap();
        store.clear();

        assert!(!store.cache_profile(id, user()));
        assert!(store.session_id().is_none());
    }

    #[test]
    fn test_clones_share_state() {
        let store = SessionStore::new();
        let other = store.clone();
        store.start(SecretString::from("tok".to_string()));
        assert!(other.is_authenticated());
    }

    #[test]
    fn test_debug_redacts_token() {
        let store = SessionStore::new();
        store.start(SecretString::from("super-secret-token".to_string()));
        assert!(!format!("{store:?}").contains("super-secret-token"));
    }
}
