//! The single authenticated-identity record and its durable mirror.

use crate::storage::{StorageBackend, StorageError};
use crate::user::AuthenticatedIdentity;
use rand::Rng;
use rand_distr::Alphanumeric;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

pub const AUTH_KEY: &str = "auth";

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct AuthTokenValue(pub String);

impl AuthTokenValue {
    pub fn generate() -> AuthTokenValue {
        let rng = rand::rng();
        let random_string: String = rng
            .sample_iter(&Alphanumeric)
            .take(64)
            .map(char::from)
            .collect();
        AuthTokenValue(random_string)
    }
}

/// Session record as persisted under the `auth` key.
///
/// Invariant: `token` is set iff `user` is set.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Session {
    pub user: Option<String>,
    pub token: Option<String>,
    #[serde(default)]
    pub admin: bool,
}

impl Session {
    fn empty() -> Session {
        Session {
            user: None,
            token: None,
            admin: false,
        }
    }

    fn is_structurally_valid(&self) -> bool {
        self.user.is_some() == self.token.is_some()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// The two states the route guard distinguishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated,
}

/// One session record, process-wide, mirrored to durable storage on every
/// change.
pub struct SessionStore {
    storage: Arc<dyn StorageBackend>,
    session: Mutex<Session>,
}

impl SessionStore {
    /// Rehydrates the session from the `auth` key when present and
    /// structurally valid; anything else starts unauthenticated.
    pub fn initialize(storage: Arc<dyn StorageBackend>) -> SessionStore {
        let session = match storage.get(AUTH_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Session>(&raw) {
                Ok(session) if session.is_structurally_valid() => session,
                Ok(_) => {
                    warn!("Persisted session breaks the user/token invariant, starting unauthenticated");
                    Session::empty()
                }
                Err(err) => {
                    warn!("Malformed persisted session, starting unauthenticated: {}", err);
                    Session::empty()
                }
            },
            Ok(None) => Session::empty(),
            Err(err) => {
                warn!("Could not read persisted session, starting unauthenticated: {}", err);
                Session::empty()
            }
        };
        SessionStore {
            storage,
            session: Mutex::new(session),
        }
    }

    /// Overwrites the session record and persists it. Authentication already
    /// happened upstream in the credential store, so this cannot be refused.
    pub fn login(&self, identity: AuthenticatedIdentity) -> Result<(), StorageError> {
        let mut session = self.session.lock().unwrap();
        *session = Session {
            user: Some(identity.username),
            token: Some(identity.token.0),
            admin: identity.admin,
        };
        let json = serde_json::to_string(&*session)?;
        self.storage.set(AUTH_KEY, &json)?;
        info!("Logged in as {}", session.user.as_deref().unwrap_or_default());
        Ok(())
    }

    /// Clears the record and deletes its durable copy entirely, so a reload
    /// with no session key is indistinguishable from first launch.
    pub fn logout(&self) -> Result<(), StorageError> {
        *self.session.lock().unwrap() = Session::empty();
        self.storage.remove(AUTH_KEY)
    }

    pub fn current(&self) -> Session {
        self.session.lock().unwrap().clone()
    }

    pub fn auth_state(&self) -> AuthState {
        if self.session.lock().unwrap().is_authenticated() {
            AuthState::Authenticated
        } else {
            AuthState::Anonymous
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn identity(username: &str) -> AuthenticatedIdentity {
        AuthenticatedIdentity {
            username: username.to_string(),
            token: AuthTokenValue::generate(),
            admin: false,
        }
    }

    #[test]
    fn token_values_are_64_alphanumeric_chars() {
        let token = AuthTokenValue::generate();
        assert_eq!(token.0.len(), 64);
        assert!(token.0.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn login_then_logout_restores_the_empty_state() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::initialize(storage.clone());

        store.login(identity("alice")).unwrap();
        assert_eq!(store.auth_state(), AuthState::Authenticated);
        assert!(storage.get(AUTH_KEY).unwrap().is_some());

        store.logout().unwrap();
        assert_eq!(store.auth_state(), AuthState::Anonymous);
        assert_eq!(store.current().user, None);
        assert_eq!(store.current().token, None);

        // The durable copy is gone, not blanked.
        assert_eq!(storage.get(AUTH_KEY).unwrap(), None);
    }

    #[test]
    fn session_rehydrates_from_storage() {
        let storage = Arc::new(MemoryStorage::new());
        SessionStore::initialize(storage.clone())
            .login(identity("alice"))
            .unwrap();

        let rehydrated = SessionStore::initialize(storage);
        let session = rehydrated.current();
        assert_eq!(session.user.as_deref(), Some("alice"));
        assert!(session.token.is_some());
    }

    #[test]
    fn malformed_session_degrades_to_unauthenticated() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(AUTH_KEY, "not json at all").unwrap();

        let store = SessionStore::initialize(storage);
        assert_eq!(store.auth_state(), AuthState::Anonymous);
    }

    #[test]
    fn invariant_breaking_session_degrades_to_unauthenticated() {
        let storage = Arc::new(MemoryStorage::new());
        // user without token
        storage
            .set(AUTH_KEY, r#"{"user":"alice","token":null,"admin":false}"#)
            .unwrap();

        let store = SessionStore::initialize(storage);
        assert_eq!(store.auth_state(), AuthState::Anonymous);
    }
}
