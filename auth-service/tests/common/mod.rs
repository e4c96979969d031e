use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use auth_service::config::DirectoryConfig;
use auth_service::domain::auth::service::AuthService;
use auth_service::domain::auth::signer::SigningKeys;
use auth_service::domain::auth::signer::TokenSigner;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::directory::HttpCredentialsDirectory;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::Json;
use axum::Router;
use serde_json::json;
use serde_json::Value;

pub const ACCESS_SECRET: &str = "test-access-secret-key-for-jwt-signing-32-bytes";
pub const REFRESH_SECRET: &str = "test-refresh-secret-key-for-jwt-signing-32-bytes";

/// Lookups for this email stall past the directory client timeout.
pub const SLOW_EMAIL: &str = "slow@example.com";

/// Directory client timeout used by the test app.
const DIRECTORY_TIMEOUT_MS: u64 = 1_000;

/// Users stored by the fake directory, keyed by email.
pub type DirectoryStore = Arc<Mutex<HashMap<String, Value>>>;

/// Test application that spawns the real server next to a fake users service
pub struct TestApp {
    pub address: String,
    pub directory: DirectoryStore,
    pub api_client: reqwest::Client,
    pub token_signer: Arc<TokenSigner>,
}

impl TestApp {
    /// Spawn both servers in background tasks and return TestApp
    pub async fn spawn() -> Self {
        let directory = DirectoryStore::default();
        let directory_url = spawn_fake_directory(Arc::clone(&directory)).await;

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let token_signer = Arc::new(TokenSigner::new(
            SigningKeys::new(
                ACCESS_SECRET,
                REFRESH_SECRET,
                "auth-service",
                "irisinfinity",
                chrono::Duration::minutes(15),
                chrono::Duration::days(7),
            )
            .expect("Failed to derive signing keys"),
        ));

        let credentials_directory = HttpCredentialsDirectory::new(&DirectoryConfig {
            base_url: directory_url,
            timeout_ms: DIRECTORY_TIMEOUT_MS,
            connect_timeout_ms: 500,
        })
        .expect("Failed to create directory client");

        let auth_service = Arc::new(AuthService::new(
            Arc::new(credentials_directory),
            Arc::clone(&token_signer),
            auth::PasswordHasher::default(),
        ));

        let router = create_router(auth_service, Arc::clone(&token_signer));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            directory,
            api_client: reqwest::Client::new(),
            token_signer,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Stored directory record for an email
    pub fn stored_user(&self, email: &str) -> Option<Value> {
        self.directory.lock().unwrap().get(email).cloned()
    }

    /// Flip the directory's enabled flag for an email
    pub fn set_enabled(&self, email: &str, enabled: bool) {
        if let Some(user) = self.directory.lock().unwrap().get_mut(email) {
            user["enabled"] = json!(enabled);
        }
    }
}

/// In-memory stand-in for the users service endpoints the directory client calls.
async fn spawn_fake_directory(store: DirectoryStore) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let address = format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port());

    let router = Router::new()
        .route("/api/v1/users", post(create_user))
        .route("/api/v1/internal/users/credentials", post(find_credentials))
        .with_state(store);

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Fake directory error");
    });

    address
}

async fn create_user(
    State(store): State<DirectoryStore>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let mut users = store.lock().unwrap();

    if users.contains_key(&email) {
        return (
            StatusCode::CONFLICT,
            Json(json!({"error": format!("User with email {} already exists", email)})),
        );
    }

    let external_id = uuid::Uuid::new_v4().to_string();
    let mut stored = body.clone();
    stored["externalId"] = json!(external_id);
    stored["enabled"] = json!(true);
    stored["roles"] = json!(["USER"]);
    users.insert(email.clone(), stored);

    (
        StatusCode::CREATED,
        Json(json!({
            "externalId": external_id,
            "email": email,
            "firstName": body["firstName"],
            "lastName": body["lastName"],
            "birthDate": body["birthDate"],
            "sex": body["sex"],
            "createdAt": "2024-05-01T10:15:30"
        })),
    )
}

async fn find_credentials(
    State(store): State<DirectoryStore>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let email = body["email"].as_str().unwrap_or_default();

    if email == SLOW_EMAIL {
        tokio::time::sleep(std::time::Duration::from_millis(DIRECTORY_TIMEOUT_MS * 3)).await;
    }

    match store.lock().unwrap().get(email) {
        Some(user) => (
            StatusCode::OK,
            Json(json!({
                "externalId": user["externalId"],
                "email": user["email"],
                "password": user["password"],
                "enabled": user["enabled"],
                "roles": user["roles"]
            })),
        ),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": format!("User with email {} not found", email)})),
        ),
    }
}
