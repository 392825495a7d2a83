use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Signed payload of an access token.
///
/// Never persisted; reconstructed from the token on every validation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Identity the token was issued for
    pub user_id: Uuid,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for an identity.
    ///
    /// # Arguments
    /// * `user_id` - Identity identifier
    /// * `expires_at` - Unix timestamp after which the token is rejected
    pub fn new(user_id: Uuid, expires_at: i64) -> Self {
        Self {
            user_id,
            exp: expires_at,
        }
    }

    /// Check if token is expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
