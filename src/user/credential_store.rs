use super::hashing::MixtapeHasher;
use super::user_models::{AuthenticatedIdentity, User};
use super::validation::ValidationError;
use crate::session::AuthTokenValue;
use crate::storage::{StorageBackend, StorageError};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{info, warn};

pub const USERS_KEY: &str = "users";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Username already exists")]
    UsernameTaken,

    // Absent user and wrong password produce the same error so usernames
    // cannot be enumerated.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

fn seed_users() -> Vec<User> {
    vec![User {
        username: "shubham".to_string(),
        password: "1234".to_string(),
        admin: true,
    }]
}

/// Registered users, loaded from the `users` key and rewritten as a whole on
/// every successful registration.
pub struct CredentialStore {
    storage: Arc<dyn StorageBackend>,
    users: Mutex<Vec<User>>,
}

impl CredentialStore {
    /// Loads the user collection, falling back to the single seeded admin
    /// record when the key is absent or its content is malformed.
    pub fn initialize(storage: Arc<dyn StorageBackend>) -> CredentialStore {
        let users = match storage.get(USERS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<User>>(&raw) {
                Ok(users) => users,
                Err(err) => {
                    warn!("Malformed users collection, reseeding: {}", err);
                    seed_users()
                }
            },
            Ok(None) => seed_users(),
            Err(err) => {
                warn!("Could not read users collection, reseeding: {}", err);
                seed_users()
            }
        };
        CredentialStore {
            storage,
            users: Mutex::new(users),
        }
    }

    /// Appends a new user with a salted hash of `password` and persists the
    /// full collection. Usernames collide on exact match only.
    pub fn register(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == username) {
            return Err(AuthError::UsernameTaken);
        }

        let hasher = MixtapeHasher::Argon2;
        let salt = hasher.generate_b64_salt();
        let hash = hasher
            .hash(password.as_bytes(), &salt)
            .map_err(|err| AuthError::Hashing(err.to_string()))?;

        let user = User {
            username: username.to_string(),
            password: hash,
            admin: false,
        };
        users.push(user.clone());
        self.persist(&users)?;
        info!("Registered user {}", user.username);
        Ok(user)
    }

    /// Checks `password` against the stored record and mints a fresh session
    /// token on success. Admin records keep the legacy plaintext sentinel and
    /// are compared directly; everyone else verifies through the hash.
    pub fn verify(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthenticatedIdentity, AuthError> {
        let users = self.users.lock().unwrap();
        let user = users
            .iter()
            .find(|u| u.username == username)
            .ok_or(AuthError::InvalidCredentials)?;

        let valid = if user.admin {
            user.password == password
        } else {
            MixtapeHasher::Argon2
                .verify(password, user.password.as_str())
                .unwrap_or(false)
        };

        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(AuthenticatedIdentity {
            username: user.username.clone(),
            token: AuthTokenValue::generate(),
            admin: user.admin,
        })
    }

    pub fn all_usernames(&self) -> Vec<String> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .map(|u| u.username.clone())
            .collect()
    }

    fn persist(&self, users: &[User]) -> Result<(), StorageError> {
        let json = serde_json::to_string(users)?;
        self.storage.set(USERS_KEY, &json)
    }
}
