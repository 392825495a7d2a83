//! Credential primitives library
//!
//! Provides the I/O free building blocks of the credential service:
//! - Salted password digests (Argon2id)
//! - RS256 access token signing and bearer validation
//! - Random salts and opaque refresh tokens
//! - The token pair wire format shared with `auth-client`
//!
//! Persistence and orchestration live in the service; this crate never touches storage.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let salt = hasher.new_salt();
//! let digest = hasher.hash("my_password", &salt).unwrap();
//! assert!(hasher.verify("my_password", &salt, &digest).unwrap());
//! ```
//!
//! ## Bearer Tokens
//! ```no_run
//! use auth::{Claims, JwtSigner, TokenValidator};
//!
//! let signer = JwtSigner::from_rsa_pem(&std::fs::read("jwtRS256.key").unwrap()).unwrap();
//! let validator =
//!     TokenValidator::from_rsa_pem(&std::fs::read("jwtRS256.key.pub").unwrap()).unwrap();
//!
//! let claims = Claims::new(uuid::Uuid::new_v4(), chrono::Utc::now().timestamp() + 300);
//! let token = signer.sign(&claims).unwrap();
//! let decoded = validator.validate(&format!("Bearer {}", token)).unwrap();
//! assert_eq!(decoded, claims);
//! ```

pub mod jwt;
pub mod password;
pub mod random;
pub mod token;

// Re-export commonly used items
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtSigner;
pub use jwt::TokenValidator;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::TokenResponse;
