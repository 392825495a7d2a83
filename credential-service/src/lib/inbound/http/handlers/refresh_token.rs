use axum::extract::Path;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use super::parse_user_id;
use super::ApiError;
use crate::credential::models::TokenResponse;
use crate::inbound::http::router::AppState;

pub const REFRESH_TOKEN_HEADER: &str = "refresh_token";

/// Exchange the refresh token carried in the `refresh_token` header for a new pair.
pub async fn refresh_token(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, ApiError> {
    let user_id = parse_user_id(&id)?;

    let refresh_token = headers
        .get(REFRESH_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .ok_or(ApiError::Unauthorized)?;

    state
        .credential_service
        .refresh_token(&user_id, refresh_token)
        .await
        .map_err(ApiError::from)
        .map(Json)
}
