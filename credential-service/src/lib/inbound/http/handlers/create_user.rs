use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::parse_user_id;
use super::ApiError;
use super::PasswordRequestBody;
use crate::inbound::http::router::AppState;

/// Create an identity. Repeating the same request succeeds again.
pub async fn create_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<PasswordRequestBody>,
) -> Result<StatusCode, ApiError> {
    let user_id = parse_user_id(&id)?;
    let password = body.try_into_password()?;

    state
        .credential_service
        .create_user(&user_id, &password)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::CREATED)
}
