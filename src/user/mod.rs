mod credential_store;
mod hashing;
mod user_models;
mod validation;

pub use credential_store::{AuthError, CredentialStore, USERS_KEY};
pub use hashing::MixtapeHasher;
pub use user_models::{AuthenticatedIdentity, User};
pub use validation::{LoginForm, RegistrationForm, ValidationError};
