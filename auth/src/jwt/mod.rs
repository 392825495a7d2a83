pub mod claims;
pub mod errors;
pub mod signer;
pub mod validator;

pub use claims::Claims;
pub use errors::JwtError;
pub use signer::JwtSigner;
pub use validator::TokenValidator;
