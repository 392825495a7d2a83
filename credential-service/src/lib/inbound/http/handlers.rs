use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use crate::credential::errors::CredentialError;
use crate::credential::errors::PasswordValidationError;
use crate::credential::errors::UserIdError;
use crate::credential::models::Password;
use crate::credential::models::UserId;
use crate::inbound::http::middleware::AuthenticatedUser;

pub mod create_user;
pub mod create_user_id;
pub mod delete_user;
pub mod login_user;
pub mod refresh_token;
pub mod update_password;

const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";
const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    Conflict(String),
    Unauthorized,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(detail) => {
                tracing::error!(error = %detail, "Request failed with internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
            }
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, UNAUTHORIZED_MESSAGE.to_string()),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Conflict => ApiError::Conflict(err.to_string()),
            CredentialError::Unauthorized => ApiError::Unauthorized,
            CredentialError::Internal(detail) => ApiError::InternalServerError(detail),
        }
    }
}

impl From<UserIdError> for ApiError {
    fn from(err: UserIdError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<PasswordValidationError> for ApiError {
    fn from(err: PasswordValidationError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// Request body shared by create, login and password update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PasswordRequestBody {
    password: String,
}

impl PasswordRequestBody {
    fn try_into_password(self) -> Result<Password, ApiError> {
        Ok(Password::new(self.password)?)
    }
}

fn parse_user_id(id: &str) -> Result<UserId, ApiError> {
    Ok(UserId::from_string(id)?)
}

/// Bearer-protected routes may only act on the identity named in the token.
fn authorize(caller: &AuthenticatedUser, id: &UserId) -> Result<(), ApiError> {
    if caller.user_id != *id {
        tracing::warn!(
            caller = %caller.user_id,
            target = %id,
            "Token does not belong to the target identity"
        );
        return Err(ApiError::Unauthorized);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_error_mapping() {
        assert_eq!(
            ApiError::from(CredentialError::Unauthorized),
            ApiError::Unauthorized
        );
        assert!(matches!(
            ApiError::from(CredentialError::Conflict),
            ApiError::Conflict(_)
        ));
        assert_eq!(
            ApiError::from(CredentialError::Internal("disk full".to_string())),
            ApiError::InternalServerError("disk full".to_string())
        );
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let response = ApiError::InternalServerError("disk full".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_authorize() {
        let id = UserId::new();
        let caller = AuthenticatedUser { user_id: id };

        assert!(authorize(&caller, &id).is_ok());
        assert_eq!(
            authorize(&caller, &UserId::new()),
            Err(ApiError::Unauthorized)
        );
    }

    #[test]
    fn test_parse_user_id() {
        assert!(parse_user_id("5cc3621d-e5ac-4d81-93df-462b27e0cc2b").is_ok());
        assert!(matches!(
            parse_user_id("nope"),
            Err(ApiError::BadRequest(_))
        ));
    }
}
