use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use chrono::Utc;

use crate::credential::errors::CredentialError;
use crate::credential::errors::StoreError;
use crate::credential::issuer::TokenIssuer;
use crate::credential::models::BootstrapUser;
use crate::credential::models::Identity;
use crate::credential::models::Password;
use crate::credential::models::TokenResponse;
use crate::credential::models::UserId;
use crate::credential::ports::CredentialServicePort;
use crate::credential::ports::CredentialStore;

/// Domain service implementation for credential operations.
///
/// Ties password hashing, the credential store and token issuance together.
/// Holds no mutable state; all ordering guarantees come from the store.
pub struct CredentialService<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
    issuer: TokenIssuer<S>,
    password_hasher: PasswordHasher,
}

impl<S> CredentialService<S>
where
    S: CredentialStore,
{
    /// Create a new credential service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential persistence implementation
    /// * `issuer` - Token issuer writing to the same store
    /// * `password_hasher` - Salted digest implementation
    pub fn new(store: Arc<S>, issuer: TokenIssuer<S>, password_hasher: PasswordHasher) -> Self {
        Self {
            store,
            issuer,
            password_hasher,
        }
    }

    async fn create_identity(
        &self,
        id: &UserId,
        password: &Password,
        is_bootstrapped: bool,
    ) -> Result<(), CredentialError> {
        let salt = self.password_hasher.new_salt();
        let password_digest = self.password_hasher.hash(password.as_str(), &salt)?;
        let now = Utc::now();

        let identity = Identity {
            id: *id,
            password_digest,
            salt,
            created_on: now,
            last_login: now,
            is_bootstrapped,
        };

        match self.store.create(identity).await {
            Ok(()) => {
                tracing::info!(user_id = %id, is_bootstrapped, "Identity created");
                Ok(())
            }
            Err(StoreError::AlreadyExists(_)) => self.verify_existing(id, password).await,
            Err(e) => Err(CredentialError::Internal(e.to_string())),
        }
    }

    /// Second branch of create: the id is taken, so the request only succeeds as a
    /// retry of the original creation.
    async fn verify_existing(
        &self,
        id: &UserId,
        password: &Password,
    ) -> Result<(), CredentialError> {
        match self.store.verify_password(id, password).await {
            Ok(()) => {
                tracing::info!(user_id = %id, "Identity already exists with matching credentials");
                Ok(())
            }
            Err(StoreError::Unauthorized(_)) => {
                tracing::warn!(user_id = %id, "Identity already exists with different credentials");
                Err(CredentialError::Conflict)
            }
            Err(e) => {
                tracing::warn!(user_id = %id, error = %e, "Existing identity could not be verified");
                Err(CredentialError::Unauthorized)
            }
        }
    }
}

/// Collapse a store failure on a credential check, logging rejections.
fn reject(operation: &str, id: &UserId, err: StoreError) -> CredentialError {
    let err = CredentialError::from(err);
    if err == CredentialError::Unauthorized {
        tracing::warn!(user_id = %id, operation, "Credentials rejected");
    }
    err
}

#[async_trait]
impl<S> CredentialServicePort for CredentialService<S>
where
    S: CredentialStore,
{
    async fn create_user(&self, id: &UserId, password: &Password) -> Result<(), CredentialError> {
        self.create_identity(id, password, false).await
    }

    async fn login_user(
        &self,
        id: &UserId,
        password: &Password,
    ) -> Result<TokenResponse, CredentialError> {
        self.store
            .verify_password(id, password)
            .await
            .map_err(|e| reject("login", id, e))?;

        if let Err(e) = self.store.record_login(id, Utc::now()).await {
            tracing::warn!(user_id = %id, error = %e, "Failed to record login time");
        }

        self.issuer.issue(id).await
    }

    async fn refresh_token(
        &self,
        id: &UserId,
        refresh_token: &str,
    ) -> Result<TokenResponse, CredentialError> {
        self.store
            .check_refresh_token(id, refresh_token, Utc::now())
            .await
            .map_err(|e| reject("refresh", id, e))?;

        self.issuer
            .rotate(id, refresh_token)
            .await
            .inspect_err(|e| {
                if *e == CredentialError::Unauthorized {
                    tracing::warn!(user_id = %id, "Refresh token was rotated concurrently");
                }
            })
    }

    async fn update_password(
        &self,
        id: &UserId,
        password: &Password,
    ) -> Result<(), CredentialError> {
        let salt = self.password_hasher.new_salt();
        let password_digest = self.password_hasher.hash(password.as_str(), &salt)?;

        self.store
            .update_password(id, &password_digest, &salt)
            .await
            .map_err(|e| reject("update_password", id, e))?;

        tracing::info!(user_id = %id, "Password updated");
        Ok(())
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), CredentialError> {
        self.store.delete(id).await?;

        tracing::info!(user_id = %id, "Identity deleted");
        Ok(())
    }

    async fn bootstrap(&self, users: &[BootstrapUser]) -> Result<(), CredentialError> {
        for user in users {
            self.create_identity(&user.id, &user.password, true).await?;
        }

        let keep: Vec<UserId> = users.iter().map(|user| user.id).collect();
        let removed = self.store.delete_bootstrapped_except(&keep).await?;

        tracing::info!(
            configured = users.len(),
            removed,
            "Bootstrap identities synchronised"
        );
        Ok(())
    }
}
