use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;

use super::authorize;
use super::parse_user_id;
use super::ApiError;
use super::PasswordRequestBody;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn update_password(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    Json(body): Json<PasswordRequestBody>,
) -> Result<StatusCode, ApiError> {
    let user_id = parse_user_id(&id)?;
    authorize(&caller, &user_id)?;
    let password = body.try_into_password()?;

    state
        .credential_service
        .update_password(&user_id, &password)
        .await
        .map_err(ApiError::from)
        .map(|_| StatusCode::NO_CONTENT)
}
