use std::env;
use std::time::Duration;

use auth::HashAlgorithm;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub refresh_secret: String,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    #[serde(default = "default_audience")]
    pub audience: String,
    #[serde(default = "default_access_ttl_minutes")]
    pub access_ttl_minutes: i64,
    #[serde(default = "default_refresh_ttl_days")]
    pub refresh_ttl_days: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DirectoryConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct PasswordConfig {
    #[serde(default)]
    pub algorithm: HashAlgorithm,
}

fn default_issuer() -> String {
    "auth-service".to_string()
}

fn default_audience() -> String {
    "irisinfinity".to_string()
}

fn default_access_ttl_minutes() -> i64 {
    15
}

fn default_refresh_ttl_days() -> i64 {
    7
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_connect_timeout_ms() -> u64 {
    2_000
}

impl JwtConfig {
    /// # Errors
    /// * `ConfigError::Message` - The minute count does not fit a duration
    pub fn access_ttl(&self) -> Result<chrono::Duration, ConfigError> {
        chrono::Duration::try_minutes(self.access_ttl_minutes).ok_or_else(|| {
            ConfigError::Message(format!(
                "jwt.access_ttl_minutes out of range: {}",
                self.access_ttl_minutes
            ))
        })
    }

    /// # Errors
    /// * `ConfigError::Message` - The day count does not fit a duration
    pub fn refresh_ttl(&self) -> Result<chrono::Duration, ConfigError> {
        chrono::Duration::try_days(self.refresh_ttl_days).ok_or_else(|| {
            ConfigError::Message(format!(
                "jwt.refresh_ttl_days out of range: {}",
                self.refresh_ttl_days
            ))
        })
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[redacted]")
            .field("refresh_secret", &"[redacted]")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_days", &self.refresh_ttl_days)
            .finish()
    }
}

impl DirectoryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, DIRECTORY__BASE_URL, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: DIRECTORY__BASE_URL=http://users-service:8080 overrides directory.base_url
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        configuration.try_deserialize()
    }
}
