use std::sync::Arc;

use auth_service::config::Config;
use auth_service::domain::auth::service::AuthService;
use auth_service::domain::auth::signer::SigningKeys;
use auth_service::domain::auth::signer::TokenSigner;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::directory::HttpCredentialsDirectory;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        directory_url = %config.directory.base_url,
        issuer = %config.jwt.issuer,
        audience = %config.jwt.audience,
        password_algorithm = ?config.password.algorithm,
        "Configuration loaded"
    );

    // Bad key material is fatal: nothing is served without it.
    let signing_keys = SigningKeys::new(
        &config.jwt.secret,
        &config.jwt.refresh_secret,
        config.jwt.issuer.clone(),
        config.jwt.audience.clone(),
        config.jwt.access_ttl()?,
        config.jwt.refresh_ttl()?,
    )?;
    let token_signer = Arc::new(TokenSigner::new(signing_keys));

    let directory = Arc::new(HttpCredentialsDirectory::new(&config.directory)?);
    let auth_service = Arc::new(AuthService::new(
        directory,
        Arc::clone(&token_signer),
        auth::PasswordHasher::new(config.password.algorithm),
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service, token_signer);
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited");

    Ok(())
}
