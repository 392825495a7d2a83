use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::credential::errors::PasswordValidationError;
use crate::credential::errors::UserIdError;

pub use auth::TokenResponse;

/// Identity unique identifier type
///
/// Generated by the client (or by `POST /user`) before creation; immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    ///
    /// # Returns
    /// UserId with random UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Arguments
    /// * `s` - UUID string to parse
    ///
    /// # Returns
    /// Parsed UserId
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for UserId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Plaintext password supplied by a caller.
///
/// Only guaranteed to be non-empty; never stored and never logged.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Wrap a plaintext password.
    ///
    /// # Errors
    /// * `Empty` - Password is the empty string
    pub fn new(password: String) -> Result<Self, PasswordValidationError> {
        if password.is_empty() {
            return Err(PasswordValidationError::Empty);
        }
        Ok(Self(password))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Stored identity record.
///
/// `password_digest` is always `hash(password, salt)`, never the plaintext.
/// Owned by the credential store; the service builds it once at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub password_digest: String,
    pub salt: String,
    pub created_on: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
    pub is_bootstrapped: bool,
}

/// Salt and digest pair read back from storage for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPassword {
    pub password_digest: String,
    pub salt: String,
}

/// Identity seeded from configuration at startup.
#[derive(Debug, Clone)]
pub struct BootstrapUser {
    pub id: UserId,
    pub password: Password,
}
