use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::DirectoryError;
use crate::domain::auth::models::Credentials;
use crate::domain::auth::models::NewUser;
use crate::domain::auth::models::RegisterUserCommand;
use crate::domain::auth::models::RegisteredUser;
use crate::domain::auth::models::TokenResponse;

/// Port for the token-issuing flows.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Create a user in the directory with a hashed password.
    ///
    /// Does not issue tokens; the caller logs in afterwards.
    ///
    /// # Arguments
    /// * `command` - Validated registration fields with plaintext password
    ///
    /// # Returns
    /// The directory's created-user representation
    ///
    /// # Errors
    /// * `PasswordHashing` - Hashing the password failed
    /// * `ServiceUnavailable` / `Downstream` - Directory call failed
    async fn register(&self, command: RegisterUserCommand) -> Result<RegisteredUser, AuthError>;

    /// Verify credentials and issue an access/refresh token pair.
    ///
    /// # Errors
    /// * `BadCredentials` - Unknown or disabled account, or wrong password
    /// * `UserIdMissing` - Directory record has no identifier
    /// * `ServiceUnavailable` / `Downstream` - Directory call failed
    async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, AuthError>;

    /// Issue a new access token for a valid refresh token.
    ///
    /// The refresh token is returned unchanged.
    ///
    /// # Errors
    /// * `InvalidToken` - Signature, format or expiry check failed
    /// * `NotARefreshToken` - Token lacks the refresh marker
    /// * `InvalidRefreshTokenPayload` - `userId` or `sub` missing or unparseable
    /// * `BadCredentials` - Account no longer exists or is disabled
    /// * `ServiceUnavailable` / `Downstream` - Directory call failed
    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, AuthError>;
}

/// External service of record for user credentials.
#[async_trait]
pub trait CredentialsDirectory: Send + Sync + 'static {
    /// Look up the stored credential record for an email.
    ///
    /// # Returns
    /// `None` when no account uses this email
    async fn find_by_email(&self, email: &str) -> Result<Option<Credentials>, DirectoryError>;

    /// Create a user from a sanitized payload (hashed password).
    async fn create_user(&self, user: &NewUser) -> Result<RegisteredUser, DirectoryError>;
}
