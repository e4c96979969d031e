use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Stored hash claims a known algorithm but cannot be parsed.
    #[error("Stored password hash is corrupt: {0}")]
    CorruptHash(String),

    /// Stored hash is in no supported format (bcrypt `$2?$`, `$argon2`).
    #[error("Unrecognized password hash format")]
    UnrecognizedHash,
}
