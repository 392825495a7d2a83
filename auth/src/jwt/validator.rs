use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;

const BEARER_PREFIX: &str = "Bearer ";

/// Verifies bearer access tokens with an RSA public key (RS256).
///
/// Performs no I/O and holds only immutable state, so a single instance can be
/// shared across all request handlers. Expiry is a hard rejection: this type never
/// re-issues or extends a token.
pub struct TokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    /// Create a validator from a PEM encoded RSA public key.
    ///
    /// # Errors
    /// * `InvalidKey` - Bytes are not a PEM RSA public key
    pub fn from_rsa_pem(public_key_pem: &[u8]) -> Result<Self, JwtError> {
        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem)
            .map_err(|e| JwtError::InvalidKey(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        // Expiry is checked against the caller's clock in `validate_at`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Validate an `Authorization` header value.
    ///
    /// # Arguments
    /// * `authorization` - Header value, expected as `Bearer <token>`
    ///
    /// # Returns
    /// Claims of the verified, unexpired token
    ///
    /// # Errors
    /// * `MissingBearer` - Value does not start with `Bearer `
    /// * `InvalidToken` - Token is malformed or its signature does not verify
    /// * `TokenExpired` - Token expiry is in the past
    pub fn validate(&self, authorization: &str) -> Result<Claims, JwtError> {
        self.validate_at(authorization, Utc::now().timestamp())
    }

    /// Validate an `Authorization` header value against an explicit clock.
    pub fn validate_at(&self, authorization: &str, now: i64) -> Result<Claims, JwtError> {
        let token = authorization
            .strip_prefix(BEARER_PREFIX)
            .ok_or(JwtError::MissingBearer)?;

        let claims = self.decode(token)?;

        if claims.is_expired(now) {
            return Err(JwtError::TokenExpired);
        }

        Ok(claims)
    }

    /// Verify the signature of a raw token and decode its claims.
    ///
    /// Does not check expiry.
    ///
    /// # Errors
    /// * `InvalidToken` - Token is malformed or its signature does not verify
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| JwtError::InvalidToken(e.to_string()))
    }
}
