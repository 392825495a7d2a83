use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use serde::Serialize;

use super::errors::JwtError;

/// Signs access tokens with an RSA private key (RS256).
///
/// The key is loaded once at startup and never changes for the process lifetime.
pub struct JwtSigner {
    encoding_key: EncodingKey,
    algorithm: Algorithm,
}

impl JwtSigner {
    /// Create a signer from a PEM encoded RSA private key.
    ///
    /// # Arguments
    /// * `private_key_pem` - PKCS#1 or PKCS#8 PEM bytes
    ///
    /// # Errors
    /// * `InvalidKey` - Bytes are not a PEM RSA private key
    pub fn from_rsa_pem(private_key_pem: &[u8]) -> Result<Self, JwtError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem)
            .map_err(|e| JwtError::InvalidKey(e.to_string()))?;

        Ok(Self {
            encoding_key,
            algorithm: Algorithm::RS256,
        })
    }

    /// Encode claims into a signed JWT.
    ///
    /// # Errors
    /// * `EncodingFailed` - Serialization or signing failed
    pub fn sign<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::jwt::Claims;

    const PRIVATE_KEY: &[u8] = include_bytes!("../../testdata/private_key.pem");

    #[test]
    fn test_sign_produces_three_segments() {
        let signer = JwtSigner::from_rsa_pem(PRIVATE_KEY).expect("Failed to load key");

        let token = signer
            .sign(&Claims::new(Uuid::new_v4(), 1700000000))
            .expect("Failed to sign token");

        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_invalid_key() {
        let result = JwtSigner::from_rsa_pem(b"not a pem");
        assert!(matches!(result, Err(JwtError::InvalidKey(_))));
    }
}
