use std::collections::BTreeSet;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::Response;
use serde::Deserialize;
use serde::Serialize;

use crate::config::DirectoryConfig;
use crate::domain::auth::errors::DirectoryError;
use crate::domain::auth::models::Credentials;
use crate::domain::auth::models::NewUser;
use crate::domain::auth::models::RegisteredUser;
use crate::domain::auth::models::Role;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::CredentialsDirectory;

const CREATE_USER_PATH: &str = "/api/v1/users";
const CREDENTIALS_PATH: &str = "/api/v1/internal/users/credentials";

/// Credentials directory reached over HTTP (the users service).
///
/// Every call is bounded by the configured timeouts; dropping the
/// returned future aborts the request.
pub struct HttpCredentialsDirectory {
    client: Client,
    base_url: String,
}

impl HttpCredentialsDirectory {
    /// Build the client from configuration.
    ///
    /// # Errors
    /// * `Unavailable` - The underlying HTTP client could not be built
    pub fn new(config: &DirectoryConfig) -> Result<Self, DirectoryError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| {
                DirectoryError::Unavailable(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Lookup body for the internal credentials endpoint.
#[derive(Debug, Serialize)]
struct CredentialsRequest<'a> {
    email: &'a str,
}

/// Wire shape of a stored credential record.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsResponse {
    external_id: Option<UserId>,
    email: String,
    password: String,
    enabled: Option<bool>,
    roles: Option<BTreeSet<Role>>,
}

impl From<CredentialsResponse> for Credentials {
    fn from(response: CredentialsResponse) -> Self {
        Self {
            external_id: response.external_id,
            email: response.email,
            password_hash: response.password,
            // Records created before the flag existed carry no value.
            enabled: response.enabled.unwrap_or(true),
            roles: response.roles.unwrap_or_default(),
        }
    }
}

#[async_trait]
impl CredentialsDirectory for HttpCredentialsDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<Credentials>, DirectoryError> {
        let response = self
            .client
            .post(self.url(CREDENTIALS_PATH))
            .json(&CredentialsRequest { email })
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!(email = %email, "No credentials on record");
            return Ok(None);
        }

        let body = success_body(response).await?;
        if is_blank(&body) {
            return Ok(None);
        }

        serde_json::from_slice::<Option<CredentialsResponse>>(&body)
            .map(|credentials| credentials.map(Credentials::from))
            .map_err(|e| DirectoryError::Decode(e.to_string()))
    }

    async fn create_user(&self, user: &NewUser) -> Result<RegisteredUser, DirectoryError> {
        let response = self
            .client
            .post(self.url(CREATE_USER_PATH))
            .json(user)
            .send()
            .await
            .map_err(transport_error)?;

        let body = success_body(response).await?;

        serde_json::from_slice::<RegisteredUser>(&body)
            .map_err(|e| DirectoryError::Decode(e.to_string()))
    }
}

/// Read the full body, turning a non-2xx status into `Status`.
async fn success_body(response: Response) -> Result<Vec<u8>, DirectoryError> {
    let status = response.status();
    let body = response.bytes().await.map_err(transport_error)?.to_vec();

    if !status.is_success() {
        return Err(DirectoryError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(body)
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

fn transport_error(error: reqwest::Error) -> DirectoryError {
    if error.is_timeout() {
        DirectoryError::Unavailable("Credentials directory request timed out".to_string())
    } else if error.is_connect() {
        DirectoryError::Unavailable("Credentials directory connection failed".to_string())
    } else {
        DirectoryError::Unavailable(format!("Credentials directory request failed: {}", error))
    }
}
