use axum::http::StatusCode;

use crate::credential::models::UserId;

/// Hand out a fresh identity id for a subsequent `PUT /user/{id}`.
pub async fn create_user_id() -> (StatusCode, String) {
    (StatusCode::CREATED, UserId::new().to_string())
}
