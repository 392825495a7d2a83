use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Environment variable {0} is not set")]
    MissingBaseUrl(&'static str),

    /// Transport failure; the service may not have seen the request
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Service answered with something other than 200 OK
    #[error("Unexpected status: {0}")]
    Status(u16),

    #[error("Failed to decode token response: {0}")]
    Decode(String),
}
