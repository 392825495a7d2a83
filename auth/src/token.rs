use serde::Deserialize;
use serde::Serialize;

/// Token pair returned on every successful login or refresh.
///
/// Expiry fields are Unix timestamps in seconds. Only the refresh half is persisted
/// by the issuing service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(rename = "expires_in")]
    pub access_expires_at: i64,
    pub refresh_token: String,
    #[serde(rename = "refresh_expires_in")]
    pub refresh_expires_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_wire_shape() {
        let response = TokenResponse {
            access_token: "a.b.c".to_string(),
            access_expires_at: 100,
            refresh_token: "r".to_string(),
            refresh_expires_at: 200,
        };

        let json = serde_json::json!({
            "access_token": "a.b.c",
            "expires_in": 100,
            "refresh_token": "r",
            "refresh_expires_in": 200
        });

        assert_eq!(serde_json::to_value(&response).unwrap(), json);
        assert_eq!(
            serde_json::from_value::<TokenResponse>(json).unwrap(),
            response
        );
    }
}
