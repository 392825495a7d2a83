//! Client for the credential service
//!
//! Lets other services log in a user and refresh its token pair over HTTP.
//! Access tokens obtained here are verified locally with [`auth::TokenValidator`].
//!
//! # Examples
//!
//! ```no_run
//! use auth_client::AuthClient;
//!
//! # async fn run() -> Result<(), auth_client::ClientError> {
//! let client = AuthClient::from_env()?;
//! let user_id = uuid::Uuid::parse_str("693227c8-4178-4e72-b3b7-a8b8bae36f1b").unwrap();
//!
//! let tokens = client.login(user_id, "mySecretUserPassword").await?;
//! let refreshed = client.refresh(user_id, &tokens.refresh_token).await?;
//! println!("{}", refreshed.access_token);
//! # Ok(())
//! # }
//! ```

mod errors;

pub use auth::TokenResponse;
pub use errors::ClientError;
use reqwest::StatusCode;
use serde::Serialize;
use uuid::Uuid;

/// Environment variable holding the credential service base URL
pub const BASE_URL_ENV: &str = "AUTH_SERVICE_URL";

/// Header carrying the refresh token on `PATCH /user/{id}/refresh`
pub const REFRESH_TOKEN_HEADER: &str = "refresh_token";

#[derive(Serialize)]
struct PasswordBody<'a> {
    password: &'a str,
}

/// HTTP client for the login and refresh endpoints.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
}

impl AuthClient {
    /// Create a client for the service at `base_url` (e.g. `http://authi:1203`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// Create a client for the URL in `AUTH_SERVICE_URL`.
    ///
    /// # Errors
    /// * `MissingBaseUrl` - Variable is unset or not unicode
    pub fn from_env() -> Result<Self, ClientError> {
        std::env::var(BASE_URL_ENV)
            .map(Self::new)
            .map_err(|_| ClientError::MissingBaseUrl(BASE_URL_ENV))
    }

    /// Log in and obtain a fresh token pair.
    ///
    /// # Arguments
    /// * `user_id` - Identity to log in as
    /// * `password` - Plaintext password
    ///
    /// # Errors
    /// * `Request` - Service unreachable
    /// * `Status` - Rejected; 401 for unknown identity or wrong password
    /// * `Decode` - Response body is not a token pair
    pub async fn login(&self, user_id: Uuid, password: &str) -> Result<TokenResponse, ClientError> {
        let response = self
            .http
            .post(self.user_url(user_id, "/login"))
            .json(&PasswordBody { password })
            .send()
            .await?;

        read_token_response(response).await
    }

    /// Exchange a refresh token for a new token pair.
    ///
    /// The presented refresh token is consumed; keep the returned one.
    ///
    /// # Errors
    /// * `Request` - Service unreachable
    /// * `Status` - Rejected; 401 for a stale, expired or foreign refresh token
    /// * `Decode` - Response body is not a token pair
    pub async fn refresh(
        &self,
        user_id: Uuid,
        refresh_token: &str,
    ) -> Result<TokenResponse, ClientError> {
        let response = self
            .http
            .patch(self.user_url(user_id, "/refresh"))
            .header(REFRESH_TOKEN_HEADER, refresh_token)
            .send()
            .await?;

        read_token_response(response).await
    }

    fn user_url(&self, user_id: Uuid, action: &str) -> String {
        format!("{}/user/{}{}", self.base_url, user_id, action)
    }
}

async fn read_token_response(response: reqwest::Response) -> Result<TokenResponse, ClientError> {
    let status = response.status();
    if status != StatusCode::OK {
        tracing::debug!(status = status.as_u16(), "Credential service rejected request");
        return Err(ClientError::Status(status.as_u16()));
    }

    response
        .json::<TokenResponse>()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_url() {
        let client = AuthClient::new("http://localhost:1203/");
        let user_id = Uuid::parse_str("693227c8-4178-4e72-b3b7-a8b8bae36f1b").unwrap();

        assert_eq!(
            client.user_url(user_id, "/login"),
            "http://localhost:1203/user/693227c8-4178-4e72-b3b7-a8b8bae36f1b/login"
        );
        assert_eq!(
            client.user_url(user_id, "/refresh"),
            "http://localhost:1203/user/693227c8-4178-4e72-b3b7-a8b8bae36f1b/refresh"
        );
    }
}
