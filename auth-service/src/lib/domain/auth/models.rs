use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::auth::errors::EmailError;
use crate::domain::auth::errors::RegistrationError;
use crate::domain::auth::errors::UserIdError;

/// Directory-assigned user identifier (`externalId`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    const MIN_LENGTH: usize = 5;
    const MAX_LENGTH: usize = 100;

    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    /// * `InvalidLength` - Email is not between 5 and 100 characters
    pub fn new(email: String) -> Result<Self, EmailError> {
        let length = email.chars().count();
        if !(Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&length) {
            return Err(EmailError::InvalidLength {
                min: Self::MIN_LENGTH,
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Role carried in access tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sex {
    Male,
    Female,
}

/// Stored credential record, as returned by the credentials directory.
///
/// The directory owns this record; the service only reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub external_id: Option<UserId>,
    pub email: String,
    pub password_hash: String,
    pub enabled: bool,
    pub roles: BTreeSet<Role>,
}

/// Validated registration request.
///
/// Holds the plaintext password until the orchestrator swaps it for a hash.
#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
    pub email: EmailAddress,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub sex: Sex,
}

impl RegisterUserCommand {
    const NAME_MIN_LENGTH: usize = 2;
    const NAME_MAX_LENGTH: usize = 50;

    /// Construct a registration command, enforcing the profile field rules.
    ///
    /// # Errors
    /// * `Email` - Email is malformed or out of bounds
    /// * `BlankPassword` - Password is empty or whitespace
    /// * `InvalidName` - First or last name is not 2-50 characters
    /// * `BirthDateNotInPast` - Birth date is today or later
    pub fn new(
        email: String,
        password: String,
        first_name: String,
        last_name: String,
        birth_date: NaiveDate,
        sex: Sex,
    ) -> Result<Self, RegistrationError> {
        let email = EmailAddress::new(email)?;

        if password.trim().is_empty() {
            return Err(RegistrationError::BlankPassword);
        }

        let first_name = Self::with_valid_name("firstName", first_name)?;
        let last_name = Self::with_valid_name("lastName", last_name)?;

        if birth_date >= Utc::now().date_naive() {
            return Err(RegistrationError::BirthDateNotInPast);
        }

        Ok(Self {
            email,
            password,
            first_name,
            last_name,
            birth_date,
            sex,
        })
    }

    fn with_valid_name(field: &'static str, name: String) -> Result<String, RegistrationError> {
        let length = name.trim().chars().count();
        if (Self::NAME_MIN_LENGTH..=Self::NAME_MAX_LENGTH).contains(&length) {
            Ok(name)
        } else {
            Err(RegistrationError::InvalidName {
                field,
                min: Self::NAME_MIN_LENGTH,
                max: Self::NAME_MAX_LENGTH,
            })
        }
    }

    /// Replace the plaintext password with its hash.
    pub fn into_new_user(self, password_hash: String) -> NewUser {
        NewUser {
            email: self.email.as_str().to_string(),
            password: password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            birth_date: self.birth_date,
            sex: self.sex,
        }
    }
}

/// Sanitized registration payload sent to the directory; `password` is a hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub sex: Sex,
}

/// Created-user representation returned by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    pub external_id: Option<UserId>,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub sex: Option<Sex>,
    pub created_at: Option<NaiveDateTime>,
}

/// Tokens issued by a successful login or refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in_seconds: i64,
    pub refresh_token: String,
}
