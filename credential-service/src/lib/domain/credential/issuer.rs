use std::sync::Arc;

use auth::Claims;
use auth::JwtSigner;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::credential::errors::CredentialError;
use crate::credential::models::TokenResponse;
use crate::credential::models::UserId;
use crate::credential::ports::CredentialStore;

/// Mints access/refresh token pairs and persists the refresh half.
///
/// A token pair is only returned after its refresh token has been written to the
/// store. If the write fails the computed pair is dropped.
pub struct TokenIssuer<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
    signer: JwtSigner,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl<S> TokenIssuer<S>
where
    S: CredentialStore,
{
    /// Create a token issuer.
    ///
    /// # Arguments
    /// * `store` - Store receiving the refresh tokens
    /// * `signer` - Access token signer holding the private key
    /// * `access_ttl` - Lifetime of access tokens
    /// * `refresh_ttl` - Lifetime of refresh tokens
    pub fn new(store: Arc<S>, signer: JwtSigner, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            store,
            signer,
            access_ttl,
            refresh_ttl,
        }
    }

    /// Issue a token pair, overwriting whatever refresh token the identity had.
    ///
    /// # Errors
    /// * `Unauthorized` - Identity no longer exists
    /// * `Internal` - Signing or storage failed
    pub async fn issue(&self, id: &UserId) -> Result<TokenResponse, CredentialError> {
        let (response, refresh_expires_at) = self.mint(id, Utc::now())?;

        self.store
            .update_refresh_token(id, &response.refresh_token, refresh_expires_at)
            .await?;

        tracing::debug!(user_id = %id, "Token pair issued");
        Ok(response)
    }

    /// Issue a token pair in exchange for the presented refresh token.
    ///
    /// # Errors
    /// * `Unauthorized` - `presented` is no longer the current unexpired token
    /// * `Internal` - Signing or storage failed
    pub async fn rotate(
        &self,
        id: &UserId,
        presented: &str,
    ) -> Result<TokenResponse, CredentialError> {
        let now = Utc::now();
        let (response, refresh_expires_at) = self.mint(id, now)?;

        self.store
            .rotate_refresh_token(id, presented, &response.refresh_token, refresh_expires_at, now)
            .await?;

        tracing::debug!(user_id = %id, "Refresh token rotated");
        Ok(response)
    }

    fn mint(
        &self,
        id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<(TokenResponse, DateTime<Utc>), CredentialError> {
        let access_expires_at = now + self.access_ttl;
        let refresh_expires_at = now + self.refresh_ttl;

        let claims = Claims::new(id.0, access_expires_at.timestamp());
        let access_token = self.signer.sign(&claims)?;

        let response = TokenResponse {
            access_token,
            access_expires_at: access_expires_at.timestamp(),
            refresh_token: auth::random::refresh_token(),
            refresh_expires_at: refresh_expires_at.timestamp(),
        };

        Ok((response, refresh_expires_at))
    }
}
