use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Password validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordValidationError {
    #[error("Password must not be empty")]
    Empty,
}

/// Outcome of a credential store operation that did not succeed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Create hit an existing identity with the same id
    #[error("Identity already exists: {0}")]
    AlreadyExists(String),

    /// No identity with this id
    #[error("Identity not found: {0}")]
    NotFound(String),

    /// Password digest or refresh token did not match, or the refresh token expired
    #[error("Credentials rejected for identity: {0}")]
    Unauthorized(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<auth::PasswordError> for StoreError {
    fn from(err: auth::PasswordError) -> Self {
        StoreError::Hashing(err.to_string())
    }
}

/// Errors surfaced by credential operations.
///
/// Deliberately coarse: "no such identity" and "wrong password" both become
/// `Unauthorized`, and every storage or signing failure becomes `Internal`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    /// Identity already exists with different credentials (create only)
    #[error("Identity already exists")]
    Conflict,

    #[error("Unauthorized")]
    Unauthorized,

    /// Detail is for server-side logging only
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for CredentialError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) | StoreError::Unauthorized(_) => CredentialError::Unauthorized,
            StoreError::AlreadyExists(_) | StoreError::Hashing(_) | StoreError::Database(_) => {
                CredentialError::Internal(err.to_string())
            }
        }
    }
}

impl From<auth::PasswordError> for CredentialError {
    fn from(err: auth::PasswordError) -> Self {
        CredentialError::Internal(format!("Password hashing failed: {}", err))
    }
}

impl From<auth::JwtError> for CredentialError {
    fn from(err: auth::JwtError) -> Self {
        CredentialError::Internal(format!("Token signing failed: {}", err))
    }
}
