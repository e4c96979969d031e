use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::health::health;
use super::handlers::login::login;
use super::handlers::me::me;
use super::handlers::refresh::refresh;
use super::handlers::register::register;
use super::middleware::authenticate as auth_middleware;
use crate::domain::auth::service::AuthService;
use crate::domain::auth::signer::TokenSigner;
use crate::outbound::directory::HttpCredentialsDirectory;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService<HttpCredentialsDirectory>>,
    pub token_signer: Arc<TokenSigner>,
}

pub fn create_router(
    auth_service: Arc<AuthService<HttpCredentialsDirectory>>,
    token_signer: Arc<TokenSigner>,
) -> Router {
    let state = AppState {
        auth_service,
        token_signer,
    };

    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh));

    let protected_routes = Router::new()
        .route("/auth/me", get(me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Headers stay out of the span; they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use axum::http::header;
    use axum::http::StatusCode;
    use chrono::Duration as TtlDuration;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::config::DirectoryConfig;
    use crate::domain::auth::models::Role;
    use crate::domain::auth::models::UserId;
    use crate::domain::auth::signer::SigningKeys;

    fn router() -> (Router, Arc<TokenSigner>) {
        let token_signer = Arc::new(TokenSigner::new(
            SigningKeys::new(
                "access-secret-key-for-jwt-signing-at-least-32-bytes",
                "refresh-secret-key-for-jwt-signing-at-least-32-bytes",
                "auth-service",
                "irisinfinity",
                TtlDuration::minutes(15),
                TtlDuration::days(7),
            )
            .unwrap(),
        ));
        // Nothing listens here.
        let directory = HttpCredentialsDirectory::new(&DirectoryConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_ms: 100,
            connect_timeout_ms: 100,
        })
        .unwrap();
        let auth_service = Arc::new(AuthService::new(
            Arc::new(directory),
            Arc::clone(&token_signer),
            auth::PasswordHasher::default(),
        ));

        (
            create_router(auth_service, Arc::clone(&token_signer)),
            token_signer,
        )
    }

    async fn body_json(response: Response<Body>) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get_me(token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/auth/me");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (router, _) = router();

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_me_requires_token() {
        let (router, _) = router();

        let response = router.oneshot(get_me(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await["error"],
            "Missing Authorization header"
        );
    }

    #[tokio::test]
    async fn test_me_returns_claims() {
        let (router, signer) = router();
        let user_id = UserId(Uuid::new_v4());
        let token = signer
            .create_access_token(&user_id, "alice@example.com", &BTreeSet::from([Role::User]))
            .unwrap();

        let response = router.oneshot(get_me(Some(&token))).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["sub"], "alice@example.com");
        assert_eq!(body["userId"], user_id.to_string());
        assert_eq!(body["roles"], serde_json::json!(["USER"]));
        assert_eq!(body["iss"], "auth-service");
    }

    #[tokio::test]
    async fn test_me_rejects_refresh_token() {
        let (router, signer) = router();
        let token = signer
            .create_refresh_token(&UserId(Uuid::new_v4()), "alice@example.com")
            .unwrap();

        let response = router.oneshot(get_me(Some(&token))).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_blank_login_is_unprocessable() {
        let (router, _) = router();

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"email":"","password":""}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["data"]["kind"], "VALIDATION_FAILED");
    }

    #[tokio::test]
    async fn test_login_with_directory_down_is_unavailable() {
        let (router, _) = router();

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"email":"alice@example.com","password":"Secret123!"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert_eq!(body["status_code"], 503);
        assert_eq!(body["data"]["kind"], "SERVICE_UNAVAILABLE");
    }
}
