use axum::http::StatusCode;
use axum::http::Uri;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::user::models::UserProfile;
use crate::user::errors::UserError;

pub mod get_profile;
pub mod health;
pub mod login;
pub mod register;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    ServiceUnavailable(String),
    BadRequest(String),
    NotFound(String),
    Unauthorized(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::error!(error = %msg, "Credential store unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Service temporarily unavailable".to_string(),
                )
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(ApiErrorData { message })).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            UserError::UserAlreadyExists(_) | UserError::InvalidUserData(_) => {
                ApiError::BadRequest(err.to_string())
            }
            UserError::UserNotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::StoreUnavailable(_) => ApiError::ServiceUnavailable(err.to_string()),
            UserError::Internal(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// Public projection of a user as sent on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

impl From<&UserProfile> for UserData {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id.to_string(),
            name: profile.name.as_str().to_string(),
            email: profile.email.as_str().to_string(),
            is_admin: profile.is_admin,
        }
    }
}

/// Fallback for routes that do not exist.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("Not Found - {}", uri))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_status_mapping() {
        let cases = [
            (UserError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (
                UserError::UserAlreadyExists("jane@x.com".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                UserError::InvalidUserData("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                UserError::UserNotFound("id".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                UserError::StoreUnavailable("timeout".to_string()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                UserError::Internal("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_user_data_wire_names() {
        let data = UserData {
            id: "abc".to_string(),
            name: "Jane".to_string(),
            email: "jane@x.com".to_string(),
            is_admin: false,
        };

        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "_id": "abc",
                "name": "Jane",
                "email": "jane@x.com",
                "isAdmin": false
            })
        );
    }
}
