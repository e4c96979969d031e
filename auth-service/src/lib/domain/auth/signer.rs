use std::collections::BTreeSet;

use auth::Claims;
use auth::JwtHandler;
use auth::SigningSecret;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::SigningKeysError;
use crate::domain::auth::models::Role;
use crate::domain::auth::models::UserId;

pub const USER_ID_CLAIM: &str = "userId";
pub const ROLES_CLAIM: &str = "roles";
pub const TYPE_CLAIM: &str = "typ";
/// `typ` value marking a refresh token. Access tokens carry no `typ`.
pub const REFRESH_TYPE: &str = "refresh";

/// Process-wide signing material, derived once at startup.
#[derive(Debug, Clone)]
pub struct SigningKeys {
    access_key: SigningSecret,
    refresh_key: SigningSecret,
    issuer: String,
    audience: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl SigningKeys {
    /// Decode both secrets (raw or base64) and validate the lifetimes.
    ///
    /// # Errors
    /// * `AccessSecret` / `RefreshSecret` - Secret is blank or too short
    /// * `SharedSecret` - Both secrets decode to the same key
    /// * `NonPositiveTtl` - A lifetime is zero or negative
    /// * `TtlOutOfRange` - A lifetime pushes the expiry past the representable range
    pub fn new(
        access_secret: &str,
        refresh_secret: &str,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Result<Self, SigningKeysError> {
        let access_key =
            SigningSecret::decode(access_secret).map_err(SigningKeysError::AccessSecret)?;
        let refresh_key =
            SigningSecret::decode(refresh_secret).map_err(SigningKeysError::RefreshSecret)?;

        if access_key == refresh_key {
            return Err(SigningKeysError::SharedSecret);
        }

        if access_ttl <= Duration::zero() || refresh_ttl <= Duration::zero() {
            return Err(SigningKeysError::NonPositiveTtl);
        }

        let now = Utc::now();
        if now.checked_add_signed(access_ttl).is_none()
            || now.checked_add_signed(refresh_ttl).is_none()
        {
            return Err(SigningKeysError::TtlOutOfRange);
        }

        Ok(Self {
            access_key,
            refresh_key,
            issuer: issuer.into(),
            audience: audience.into(),
            access_ttl,
            refresh_ttl,
        })
    }
}

/// Mints and verifies access and refresh tokens.
///
/// Each token kind has its own key, so a token is only ever accepted by the
/// verifier of the kind it was minted as. Immutable after construction and
/// shared read-only across requests.
pub struct TokenSigner {
    access: JwtHandler,
    refresh: JwtHandler,
    issuer: String,
    audience: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenSigner {
    pub fn new(keys: SigningKeys) -> Self {
        let handler = |key: &SigningSecret| {
            JwtHandler::new(key)
                .with_issuer(keys.issuer.clone())
                .with_audience(keys.audience.clone())
        };

        Self {
            access: handler(&keys.access_key),
            refresh: handler(&keys.refresh_key),
            issuer: keys.issuer.clone(),
            audience: keys.audience.clone(),
            access_ttl: keys.access_ttl,
            refresh_ttl: keys.refresh_ttl,
        }
    }

    /// Access token lifetime, as reported in `expiresInSeconds`.
    pub fn access_ttl_seconds(&self) -> i64 {
        self.access_ttl.num_seconds()
    }

    /// Sign an access token carrying the user's roles.
    ///
    /// # Errors
    /// * `TokenSigning` - Claims could not be serialized
    pub fn create_access_token(
        &self,
        user_id: &UserId,
        email: &str,
        roles: &BTreeSet<Role>,
    ) -> Result<String, AuthError> {
        self.create_access_token_at(user_id, email, roles, Utc::now())
    }

    /// Sign a refresh token. Carries no roles.
    ///
    /// # Errors
    /// * `TokenSigning` - Claims could not be serialized
    pub fn create_refresh_token(&self, user_id: &UserId, email: &str) -> Result<String, AuthError> {
        self.create_refresh_token_at(user_id, email, Utc::now())
    }

    /// Verify a refresh token's signature, issuer, audience and expiry.
    ///
    /// The `typ` claim is left for the caller to check.
    ///
    /// # Errors
    /// * `InvalidToken` - Any verification failure, including tokens signed with the access key
    pub fn parse_refresh_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.refresh
            .decode::<Claims>(token)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    /// Verify a bearer access token.
    ///
    /// # Errors
    /// * `InvalidToken` - Verification failed or the token is marked as a refresh token
    pub fn parse_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = self
            .access
            .decode::<Claims>(token)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        if claims.extra_str(TYPE_CLAIM) == Some(REFRESH_TYPE) {
            return Err(AuthError::InvalidToken(
                "Refresh token presented as access token".to_string(),
            ));
        }

        Ok(claims)
    }

    fn create_access_token_at(
        &self,
        user_id: &UserId,
        email: &str,
        roles: &BTreeSet<Role>,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = self
            .base_claims(user_id, email, now, self.access_ttl)?
            .with_extra(ROLES_CLAIM, roles);

        self.access
            .encode(&claims)
            .map_err(|e| AuthError::TokenSigning(e.to_string()))
    }

    fn create_refresh_token_at(
        &self,
        user_id: &UserId,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = self
            .base_claims(user_id, email, now, self.refresh_ttl)?
            .with_extra(TYPE_CLAIM, REFRESH_TYPE);

        self.refresh
            .encode(&claims)
            .map_err(|e| AuthError::TokenSigning(e.to_string()))
    }

    fn base_claims(
        &self,
        user_id: &UserId,
        email: &str,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Claims, AuthError> {
        let claims = Claims::issued(now, ttl).ok_or_else(|| {
            AuthError::TokenSigning("Token expiry out of range".to_string())
        })?;

        Ok(claims
            .with_subject(email)
            .with_issuer(&self.issuer)
            .with_audience(&self.audience)
            .with_random_id()
            .with_extra(USER_ID_CLAIM, user_id.to_string()))
    }
}
