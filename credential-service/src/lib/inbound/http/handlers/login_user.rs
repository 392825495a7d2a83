use axum::extract::Path;
use axum::extract::State;
use axum::Json;

use super::parse_user_id;
use super::ApiError;
use super::PasswordRequestBody;
use crate::credential::models::TokenResponse;
use crate::inbound::http::router::AppState;

pub async fn login_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<PasswordRequestBody>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user_id = parse_user_id(&id)?;
    let password = body.try_into_password()?;

    state
        .credential_service
        .login_user(&user_id, &password)
        .await
        .map_err(ApiError::from)
        .map(Json)
}
