pub mod memory;
pub mod postgres;
pub mod sqlite;

pub use memory::InMemoryCredentialStore;
pub use postgres::PostgresCredentialStore;
pub use sqlite::SqliteCredentialStore;

use auth::PasswordHasher;

use crate::credential::errors::StoreError;
use crate::credential::models::Password;
use crate::credential::models::StoredPassword;
use crate::credential::models::UserId;

/// Compare `password` against a stored salt and digest.
///
/// # Errors
/// * `NotFound` - `stored` is `None`
/// * `Unauthorized` - Digest mismatch
/// * `Hashing` - Stored salt unusable
fn check_password(
    hasher: &PasswordHasher,
    id: &UserId,
    password: &Password,
    stored: Option<StoredPassword>,
) -> Result<(), StoreError> {
    let stored = stored.ok_or_else(|| StoreError::NotFound(id.to_string()))?;

    if hasher.verify(password.as_str(), &stored.salt, &stored.password_digest)? {
        Ok(())
    } else {
        Err(StoreError::Unauthorized(id.to_string()))
    }
}
