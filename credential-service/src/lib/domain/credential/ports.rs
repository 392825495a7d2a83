use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::credential::errors::CredentialError;
use crate::credential::errors::StoreError;
use crate::credential::models::BootstrapUser;
use crate::credential::models::Identity;
use crate::credential::models::Password;
use crate::credential::models::TokenResponse;
use crate::credential::models::UserId;

/// Port for credential lifecycle operations.
#[async_trait]
pub trait CredentialServicePort: Send + Sync + 'static {
    /// Create an identity, or accept a retry of an identical creation.
    ///
    /// # Arguments
    /// * `id` - Identity ID chosen by the caller
    /// * `password` - Plaintext password
    ///
    /// # Errors
    /// * `Conflict` - Identity exists with a different password
    /// * `Unauthorized` - Identity exists but could not be verified
    /// * `Internal` - Storage or hashing failed
    async fn create_user(&self, id: &UserId, password: &Password) -> Result<(), CredentialError>;

    /// Verify a password and issue a fresh token pair.
    ///
    /// # Errors
    /// * `Unauthorized` - Unknown identity or wrong password (indistinguishable)
    /// * `Internal` - Storage or signing failed
    async fn login_user(
        &self,
        id: &UserId,
        password: &Password,
    ) -> Result<TokenResponse, CredentialError>;

    /// Exchange the current refresh token for a fresh token pair.
    ///
    /// The presented token is unusable afterwards, even if the caller never receives
    /// the response.
    ///
    /// # Errors
    /// * `Unauthorized` - Token is not the current one, or has expired
    /// * `Internal` - Storage or signing failed
    async fn refresh_token(
        &self,
        id: &UserId,
        refresh_token: &str,
    ) -> Result<TokenResponse, CredentialError>;

    /// Replace the password with a freshly salted digest.
    ///
    /// Refresh token state is left untouched.
    ///
    /// # Errors
    /// * `Unauthorized` - Identity does not exist
    /// * `Internal` - Storage or hashing failed
    async fn update_password(&self, id: &UserId, password: &Password)
        -> Result<(), CredentialError>;

    /// Delete an identity. Deleting a missing identity succeeds.
    ///
    /// # Errors
    /// * `Internal` - Storage failed
    async fn delete_user(&self, id: &UserId) -> Result<(), CredentialError>;

    /// Seed configured identities and remove bootstrapped identities no longer configured.
    ///
    /// Safe to run on every startup.
    ///
    /// # Errors
    /// * `Conflict` - A configured identity exists with a different password
    /// * `Unauthorized` - A configured identity exists but could not be verified
    /// * `Internal` - Storage or hashing failed
    async fn bootstrap(&self, users: &[BootstrapUser]) -> Result<(), CredentialError>;
}

/// Durable storage for identities and their refresh token state.
///
/// Every operation is a single atomic row-level statement; the service holds no locks
/// across calls and relies on these guarantees for correctness.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Insert a new identity.
    ///
    /// # Errors
    /// * `AlreadyExists` - An identity with this id exists
    /// * `Database` - Storage failed
    async fn create(&self, identity: Identity) -> Result<(), StoreError>;

    /// Recompute the digest of `password` with the stored salt and compare.
    ///
    /// # Errors
    /// * `NotFound` - No identity with this id
    /// * `Unauthorized` - Digest mismatch
    /// * `Hashing` - Stored salt unusable
    /// * `Database` - Storage failed
    async fn verify_password(&self, id: &UserId, password: &Password) -> Result<(), StoreError>;

    /// Set the last login time.
    ///
    /// # Errors
    /// * `NotFound` - No identity with this id
    /// * `Database` - Storage failed
    async fn record_login(&self, id: &UserId, at: DateTime<Utc>) -> Result<(), StoreError>;

    /// Overwrite the refresh token unconditionally.
    ///
    /// # Errors
    /// * `NotFound` - No identity with this id
    /// * `Database` - Storage failed
    async fn update_refresh_token(
        &self,
        id: &UserId,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Check that `refresh_token` is the current token and `expires_at > now`.
    ///
    /// Read-only; see [`CredentialStore::rotate_refresh_token`] for the write.
    ///
    /// # Errors
    /// * `Unauthorized` - Token mismatch, expired, or no identity
    /// * `Database` - Storage failed
    async fn check_refresh_token(
        &self,
        id: &UserId,
        refresh_token: &str,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Replace `presented` with `refresh_token` in a single conditional write.
    ///
    /// Succeeds only if `presented` is still the current, unexpired token, so of two
    /// concurrent rotations of the same token exactly one wins.
    ///
    /// # Errors
    /// * `Unauthorized` - No row matched
    /// * `Database` - Storage failed
    async fn rotate_refresh_token(
        &self,
        id: &UserId,
        presented: &str,
        refresh_token: &str,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Replace the password digest and salt.
    ///
    /// # Errors
    /// * `NotFound` - No identity with this id
    /// * `Database` - Storage failed
    async fn update_password(
        &self,
        id: &UserId,
        password_digest: &str,
        salt: &str,
    ) -> Result<(), StoreError>;

    /// Remove an identity. Removing a missing identity succeeds.
    ///
    /// # Errors
    /// * `Database` - Storage failed
    async fn delete(&self, id: &UserId) -> Result<(), StoreError>;

    /// Remove bootstrapped identities whose id is not in `keep`.
    ///
    /// # Returns
    /// Number of identities removed
    ///
    /// # Errors
    /// * `Database` - Storage failed
    async fn delete_bootstrapped_except(&self, keep: &[UserId]) -> Result<u64, StoreError>;
}
