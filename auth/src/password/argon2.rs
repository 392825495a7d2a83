use argon2::password_hash::Output;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;
use crate::random;

/// Salted password digest.
///
/// The salt is supplied by the caller and stored next to the digest, so the same
/// `(password, salt)` pair always yields the same digest. Verification recomputes
/// the digest from the stored salt and compares it with the stored value.
///
/// Internally uses Argon2id; the digest is the unpadded base64 of the raw output.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Create a password hasher with the Argon2 default cost parameters.
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Create a password hasher with explicit Argon2id cost parameters.
    ///
    /// # Arguments
    /// * `memory_kib` - Memory cost in KiB
    /// * `iterations` - Number of passes
    /// * `parallelism` - Degree of parallelism
    ///
    /// # Errors
    /// * `InvalidParameters` - Parameters are outside Argon2's accepted ranges
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, PasswordError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| PasswordError::InvalidParameters(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Generate a fresh salt.
    ///
    /// Called every time a password is set or changed; salts are never reused.
    ///
    /// # Returns
    /// 32 random alphanumeric characters
    pub fn new_salt(&self) -> String {
        random::alphanumeric(random::TOKEN_LENGTH)
    }

    /// Compute the digest of a password with the given salt.
    ///
    /// # Arguments
    /// * `password` - Plaintext password
    /// * `salt` - Salt previously produced by [`PasswordHasher::new_salt`]
    ///
    /// # Returns
    /// Base64 digest, deterministic for a given `(password, salt)`
    ///
    /// # Errors
    /// * `InvalidSalt` - Salt is not usable as an Argon2 salt
    /// * `HashingFailed` - Hashing operation failed
    pub fn hash(&self, password: &str, salt: &str) -> Result<String, PasswordError> {
        self.derive(password, salt).map(|output| output.to_string())
    }

    /// Check a password against a stored salt and digest.
    ///
    /// # Returns
    /// True if recomputing the digest yields the stored digest
    ///
    /// # Errors
    /// * `InvalidSalt` - Stored salt is not usable as an Argon2 salt
    /// * `HashingFailed` - Hashing operation failed
    pub fn verify(&self, password: &str, salt: &str, digest: &str) -> Result<bool, PasswordError> {
        let computed = self.derive(password, salt)?;

        // Output equality is constant-time.
        Ok(Output::b64_decode(digest)
            .map(|stored| stored == computed)
            .unwrap_or(false))
    }

    fn derive(&self, password: &str, salt: &str) -> Result<Output, PasswordError> {
        let salt =
            SaltString::from_b64(salt).map_err(|e| PasswordError::InvalidSalt(e.to_string()))?;

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

        hash.hash
            .ok_or_else(|| PasswordError::HashingFailed("missing hash output".to_string()))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
