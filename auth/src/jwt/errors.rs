use thiserror::Error;

/// Error type for JWT operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Failed to decode token: {0}")]
    DecodingFailed(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token issuer is not accepted")]
    InvalidIssuer,

    #[error("Token audience is not accepted")]
    InvalidAudience,

    #[error("Missing required claim: {0}")]
    MissingClaim(String),
}
