use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::domain::auth::errors::AuthError;

pub mod health;
pub mod login;
pub mod me;
pub mod refresh;
pub mod register;

/// Successful response; the DTO is the whole body.
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

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Request body failed validation before reaching the domain.
    UnprocessableEntity(String),
    /// Domain failure, already classified.
    Domain {
        status: StatusCode,
        kind: &'static str,
        message: String,
        details: Option<Value>,
    },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Domain { status, .. } => *status,
        }
    }

    fn domain(status: StatusCode, err: &AuthError, message: impl Into<String>) -> Self {
        ApiError::Domain {
            status,
            kind: err.kind(),
            message: message.into(),
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let data = match self {
            ApiError::UnprocessableEntity(message) => ApiErrorData {
                message,
                kind: "VALIDATION_FAILED",
                details: None,
            },
            ApiError::Domain {
                kind,
                message,
                details,
                ..
            } => ApiErrorData {
                message,
                kind,
                details,
            },
        };

        (status, Json(ApiResponseBody::new(status, data))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match &err {
            AuthError::BadCredentials => {
                ApiError::domain(StatusCode::UNAUTHORIZED, &err, err.to_string())
            }
            AuthError::InvalidToken(reason) => {
                tracing::debug!(reason = %reason, "Token rejected");
                ApiError::domain(StatusCode::UNAUTHORIZED, &err, "Invalid token")
            }
            AuthError::NotARefreshToken | AuthError::InvalidRefreshTokenPayload => {
                ApiError::domain(StatusCode::BAD_REQUEST, &err, err.to_string())
            }
            AuthError::UserIdMissing => {
                ApiError::domain(StatusCode::INTERNAL_SERVER_ERROR, &err, err.to_string())
            }
            AuthError::ServiceUnavailable(reason) => {
                tracing::warn!(reason = %reason, "Responding with service unavailable");
                ApiError::domain(
                    StatusCode::SERVICE_UNAVAILABLE,
                    &err,
                    "Credentials directory unavailable",
                )
            }
            AuthError::Downstream { status, message } => {
                let status = StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY);
                let (message, details) = downstream_body(message);
                ApiError::Domain {
                    status,
                    kind: err.kind(),
                    message,
                    details,
                }
            }
            AuthError::PasswordHashing(reason) | AuthError::TokenSigning(reason) => {
                tracing::error!(kind = err.kind(), reason = %reason, "Internal failure");
                ApiError::domain(StatusCode::INTERNAL_SERVER_ERROR, &err, "Internal server error")
            }
        }
    }
}

/// Split a forwarded directory body into a message and optional JSON details.
fn downstream_body(body: &str) -> (String, Option<Value>) {
    const GENERIC: &str = "Credentials directory rejected the request";

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(mut object)) => match object.remove("error") {
            Some(Value::String(message)) => (message, None),
            Some(error) => (GENERIC.to_string(), Some(error)),
            None => (GENERIC.to_string(), Some(Value::Object(object))),
        },
        Ok(Value::String(message)) => (message, None),
        Ok(other) => (GENERIC.to_string(), Some(other)),
        Err(_) => (body.to_string(), None),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}
