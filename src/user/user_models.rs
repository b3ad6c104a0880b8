use crate::session::AuthTokenValue;
use serde::{Deserialize, Serialize};

/// A registered user record as persisted under the `users` key.
///
/// `password` holds an argon2 hash string for users created through
/// registration. The seeded admin record keeps its plaintext sentinel and is
/// verified by direct comparison instead.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub admin: bool,
}

/// The identity handed to the session store after a successful verification.
#[derive(Clone, Debug)]
pub struct AuthenticatedIdentity {
    pub username: String,
    pub token: AuthTokenValue,
    pub admin: bool,
}
