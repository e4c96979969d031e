use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::Credentials;
use crate::domain::auth::models::RegisterUserCommand;
use crate::domain::auth::models::RegisteredUser;
use crate::domain::auth::models::TokenResponse;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::CredentialsDirectory;
use crate::domain::auth::signer::TokenSigner;
use crate::domain::auth::signer::REFRESH_TYPE;
use crate::domain::auth::signer::TYPE_CLAIM;
use crate::domain::auth::signer::USER_ID_CLAIM;

/// Domain service implementing the register, login and refresh flows.
///
/// Holds no mutable state; every credential lookup goes to the directory.
pub struct AuthService<D>
where
    D: CredentialsDirectory,
{
    directory: Arc<D>,
    token_signer: Arc<TokenSigner>,
    password_hasher: auth::PasswordHasher,
}

impl<D> AuthService<D>
where
    D: CredentialsDirectory,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `directory` - Credentials directory client
    /// * `token_signer` - Shared token signer built from the startup keys
    /// * `password_hasher` - Hasher used for new registrations and verification
    pub fn new(
        directory: Arc<D>,
        token_signer: Arc<TokenSigner>,
        password_hasher: auth::PasswordHasher,
    ) -> Self {
        Self {
            directory,
            token_signer,
            password_hasher,
        }
    }

    /// Fetch an account that may sign in. Absent and disabled look the same.
    async fn active_credentials(&self, email: &str) -> Result<Credentials, AuthError> {
        let credentials = self
            .directory
            .find_by_email(email)
            .await?
            .ok_or(AuthError::BadCredentials)?;

        if !credentials.enabled {
            tracing::info!(email = %email, "Sign-in attempt on disabled account");
            return Err(AuthError::BadCredentials);
        }

        Ok(credentials)
    }

    /// Hash on the blocking pool; bcrypt and argon2 are CPU-bound.
    async fn hash_password(&self, password: String) -> Result<String, AuthError> {
        let hasher = self.password_hasher.clone();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::PasswordHashing(e.to_string()))?
            .map_err(|e| AuthError::PasswordHashing(e.to_string()))
    }

    async fn verify_password(
        &self,
        password: &str,
        credentials: &Credentials,
    ) -> Result<(), AuthError> {
        let hasher = self.password_hasher.clone();
        let password = password.to_string();
        let stored_hash = credentials.password_hash.clone();

        let verified = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(|e| AuthError::PasswordHashing(e.to_string()))?;

        match verified {
            Ok(true) => Ok(()),
            Ok(false) => Err(AuthError::BadCredentials),
            Err(e) => {
                tracing::warn!(
                    email = %credentials.email,
                    error = %e,
                    "Stored password hash could not be checked"
                );
                Err(AuthError::BadCredentials)
            }
        }
    }

    fn access_token_response(
        &self,
        user_id: &UserId,
        credentials: &Credentials,
        refresh_token: String,
    ) -> Result<TokenResponse, AuthError> {
        let access_token = self.token_signer.create_access_token(
            user_id,
            &credentials.email,
            &credentials.roles,
        )?;

        Ok(TokenResponse {
            access_token,
            expires_in_seconds: self.token_signer.access_ttl_seconds(),
            refresh_token,
        })
    }
}

#[async_trait]
impl<D> AuthServicePort for AuthService<D>
where
    D: CredentialsDirectory,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<RegisteredUser, AuthError> {
        let password_hash = self.hash_password(command.password.clone()).await?;

        let new_user = command.into_new_user(password_hash);
        let registered = self.directory.create_user(&new_user).await?;

        tracing::info!(
            email = %registered.email,
            external_id = ?registered.external_id,
            "User registered"
        );

        Ok(registered)
    }

    async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, AuthError> {
        let credentials = self.active_credentials(email).await?;
        self.verify_password(password, &credentials).await?;

        let user_id = credentials.external_id.ok_or_else(|| {
            tracing::error!(email = %email, "Directory record has no external id");
            AuthError::UserIdMissing
        })?;

        let refresh_token = self
            .token_signer
            .create_refresh_token(&user_id, &credentials.email)?;
        let response = self.access_token_response(&user_id, &credentials, refresh_token)?;

        tracing::info!(user_id = %user_id, "Login succeeded");

        Ok(response)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse, AuthError> {
        let claims = match self.token_signer.parse_refresh_token(refresh_token) {
            Ok(claims) => claims,
            // A live access token is well-formed, just the wrong kind.
            Err(_) if self.token_signer.parse_access_token(refresh_token).is_ok() => {
                return Err(AuthError::NotARefreshToken);
            }
            Err(e) => return Err(e),
        };

        if claims.extra_str(TYPE_CLAIM) != Some(REFRESH_TYPE) {
            return Err(AuthError::NotARefreshToken);
        }

        let user_id = claims
            .extra_str(USER_ID_CLAIM)
            .and_then(|id| UserId::from_string(id).ok())
            .ok_or(AuthError::InvalidRefreshTokenPayload)?;
        let email = claims
            .sub
            .as_deref()
            .filter(|sub| !sub.is_empty())
            .ok_or(AuthError::InvalidRefreshTokenPayload)?;

        // Roles are re-read so the new access token reflects current grants.
        let credentials = self.active_credentials(email).await?;

        match credentials.external_id {
            None => {
                tracing::error!(email = %email, "Directory record has no external id");
                return Err(AuthError::UserIdMissing);
            }
            Some(current) if current != user_id => {
                tracing::warn!(
                    token_user_id = %user_id,
                    current_user_id = %current,
                    "Refresh token subject now belongs to another account"
                );
                return Err(AuthError::BadCredentials);
            }
            Some(_) => {}
        }

        let response =
            self.access_token_response(&user_id, &credentials, refresh_token.to_string())?;

        tracing::debug!(user_id = %user_id, "Access token refreshed");

        Ok(response)
    }
}
