use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::auth::errors::RegistrationError;
use crate::domain::auth::models::RegisterUserCommand;
use crate::domain::auth::models::RegisteredUser;
use crate::domain::auth::models::Sex;
use crate::domain::auth::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<RegisteredUser>, ApiError> {
    state
        .auth_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|user| ApiSuccess::new(StatusCode::CREATED, user))
}

/// HTTP request body for registration (raw JSON)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    email: String,
    password: String,
    first_name: String,
    last_name: String,
    birth_date: String,
    sex: String,
}

#[derive(Debug, Clone, Error)]
enum ParseRegisterRequestError {
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error("Birth date must be an ISO date (YYYY-MM-DD): {0}")]
    BirthDate(String),

    #[error("Sex must be MALE or FEMALE")]
    Sex,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterUserCommand, ParseRegisterRequestError> {
        let birth_date = NaiveDate::parse_from_str(self.birth_date.trim(), "%Y-%m-%d")
            .map_err(|e| ParseRegisterRequestError::BirthDate(e.to_string()))?;
        let sex = match self.sex.trim() {
            "MALE" => Sex::Male,
            "FEMALE" => Sex::Female,
            _ => return Err(ParseRegisterRequestError::Sex),
        };

        Ok(RegisterUserCommand::new(
            self.email,
            self.password,
            self.first_name,
            self.last_name,
            birth_date,
            sex,
        )?)
    }
}

impl From<ParseRegisterRequestError> for ApiError {
    fn from(err: ParseRegisterRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RegisterRequest {
        RegisterRequest {
            email: "alice@example.com".to_string(),
            password: "Secret123!".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Liddell".to_string(),
            birth_date: "1990-01-01".to_string(),
            sex: "FEMALE".to_string(),
        }
    }

    #[test]
    fn test_valid_request_converts() {
        let command = request().try_into_command().unwrap();
        assert_eq!(command.email.as_str(), "alice@example.com");
        assert_eq!(command.sex, Sex::Female);
    }

    #[test]
    fn test_missing_fields_are_unprocessable() {
        let body: RegisterRequest =
            serde_json::from_str(r#"{"email":"alice@example.com"}"#).unwrap();
        let err = ApiError::from(body.try_into_command().unwrap_err());
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_bad_birth_date_rejected() {
        let mut body = request();
        body.birth_date = "01/01/1990".to_string();
        assert!(matches!(
            body.try_into_command(),
            Err(ParseRegisterRequestError::BirthDate(_))
        ));
    }

    #[test]
    fn test_unknown_sex_rejected() {
        let mut body = request();
        body.sex = "OTHER".to_string();
        assert!(matches!(
            body.try_into_command(),
            Err(ParseRegisterRequestError::Sex)
        ));
    }
}
