use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::Rng;

/// Length of every salt and refresh token handed out by this crate.
pub const TOKEN_LENGTH: usize = 32;

/// Generate a random alphanumeric string from the operating system RNG.
///
/// # Arguments
/// * `length` - Number of characters to generate
///
/// # Returns
/// String of `length` characters drawn from `[A-Za-z0-9]`
pub fn alphanumeric(length: usize) -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Generate a new opaque refresh token.
pub fn refresh_token() -> String {
    alphanumeric(TOKEN_LENGTH)
}
