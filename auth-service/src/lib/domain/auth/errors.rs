use auth::SecretError;
use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),

    #[error("Email must be between {min} and {max} characters, got {actual}")]
    InvalidLength {
        min: usize,
        max: usize,
        actual: usize,
    },
}

/// Error for registration payload validation
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Password is mandatory")]
    BlankPassword,

    #[error("{field} must be between {min} and {max} characters")]
    InvalidName {
        field: &'static str,
        min: usize,
        max: usize,
    },

    #[error("Birth date must be in the past")]
    BirthDateNotInPast,
}

/// Startup failure while deriving the signing keys.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SigningKeysError {
    #[error("Invalid access token secret: {0}")]
    AccessSecret(SecretError),

    #[error("Invalid refresh token secret: {0}")]
    RefreshSecret(SecretError),

    #[error("Access and refresh token secrets must differ")]
    SharedSecret,

    #[error("Token lifetimes must be positive")]
    NonPositiveTtl,

    #[error("Token lifetime too large to compute an expiry")]
    TtlOutOfRange,
}

/// Failure reported by a credentials directory call, before translation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryError {
    /// Timeout, refused connection or any other transport failure.
    #[error("Credentials directory unreachable: {0}")]
    Unavailable(String),

    /// The directory answered with a non-2xx status.
    #[error("Credentials directory returned {status}")]
    Status { status: u16, body: Vec<u8> },

    /// A 2xx response whose body could not be read.
    #[error("Unreadable credentials directory response: {0}")]
    Decode(String),
}

/// Top-level error for the register, login and refresh flows.
///
/// Closed set of failure kinds; the HTTP boundary picks the status code by kind.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown or disabled account, or wrong password. Deliberately one variant.
    #[error("Bad credentials")]
    BadCredentials,

    #[error("Not a refresh token")]
    NotARefreshToken,

    #[error("Invalid refresh token payload")]
    InvalidRefreshTokenPayload,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// The directory returned a record without an identifier.
    #[error("User id missing")]
    UserIdMissing,

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Directory rejection forwarded with its status and message.
    #[error("{message}")]
    Downstream { status: u16, message: String },

    #[error("Password hashing failed: {0}")]
    PasswordHashing(String),

    #[error("Token signing failed: {0}")]
    TokenSigning(String),
}

impl AuthError {
    /// Stable machine-readable tag for the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::BadCredentials => "BAD_CREDENTIALS",
            AuthError::NotARefreshToken => "NOT_A_REFRESH_TOKEN",
            AuthError::InvalidRefreshTokenPayload => "INVALID_REFRESH_TOKEN_PAYLOAD",
            AuthError::InvalidToken(_) => "INVALID_TOKEN",
            AuthError::UserIdMissing => "USER_ID_MISSING",
            AuthError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            AuthError::Downstream { .. } => "DOWNSTREAM_ERROR",
            AuthError::PasswordHashing(_) => "PASSWORD_HASHING_FAILED",
            AuthError::TokenSigning(_) => "TOKEN_SIGNING_FAILED",
        }
    }
}
