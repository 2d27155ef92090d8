/*
 * Responsibility
 * - tracing / panic hook setup
 * - load Config → build dependencies (pool, AuthService) → assemble Router
 * - apply cross-cutting middleware (security headers, CORS, HTTP)
 * - axum::serve() with graceful shutdown
 */
use std::{panic, process};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::Config,
    middleware::{cors, http, security_headers},
    services::auth::build_auth_service,
    state::AppState,
};

fn init_tracing() {
    // RUST_LOG wins when set, e.g.
    // RUST_LOG=info,access_gate=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash loudly. Production: default hook, keep serving.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("loading configuration")?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {} (auth: {:?})",
        config.app_env,
        config.addr,
        config.auth
    );

    let db = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(config.database_acquire_timeout)
        .connect(&config.database_url)
        .await
        .context("connecting to the user database")?;

    let auth = build_auth_service(&config.auth, db.clone());
    let state = AppState::new(db, auth);

    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    let router = security_headers::apply(router);
    let router = cors::apply(router, config);
    http::apply(router, config)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::config::{AppEnv, AuthConfig};
    use crate::services::auth::directory::testing::MemoryDirectory;
    use crate::services::auth::{AuthService, Principal, Role};

    const SECRET: &str = "router-test-signature";

    fn config() -> Config {
        Config {
            addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            app_env: AppEnv::Development,
            cors_allowed_origins: Vec::new(),
            database_url: "postgres://nobody@127.0.0.1:1/none".into(),
            database_max_connections: 1,
            database_acquire_timeout: Duration::from_millis(50),
            request_timeout: Duration::from_secs(5),
            request_body_limit_bytes: 1024,
            auth: AuthConfig::new("Bearer ", SECRET, 0).unwrap(),
        }
    }

    fn router() -> Router {
        let config = config();
        // Lazy pool: these tests never reach a route that queries it.
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        let directory = MemoryDirectory::new([
            Principal {
                id: "u1".into(),
                email: "root@example.com".into(),
                user_name: "root".into(),
                role: Role::Admin,
            },
            Principal {
                id: "u2".into(),
                email: "jane@example.com".into(),
                user_name: "jane".into(),
                role: Role::User,
            },
        ]);
        let auth = Arc::new(AuthService::new(&config.auth, Arc::new(directory)));

        build_router(AppState::new(db, auth), &config)
    }

    fn bearer(id: &str) -> String {
        let token = jsonwebtoken::encode(
            &Header::default(),
            &json!({"id": id, "isLoggedIn": true}),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        format!("Bearer {token}")
    }

    async fn get(uri: &str, authorization: Option<String>) -> (StatusCode, Value) {
        let mut req = Request::builder().uri(uri);
        if let Some(value) = authorization {
            req = req.header(header::AUTHORIZATION, value);
        }
        let res = router()
            .oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn health_is_open() {
        let (status, body) = get("/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn me_requires_a_credential() {
        let (status, body) = get("/api/v1/me", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Invalid Bearer key");
    }

    #[tokio::test]
    async fn me_accepts_any_registered_role() {
        for (id, role) in [("u1", "Admin"), ("u2", "User")] {
            let (status, body) = get("/api/v1/me", Some(bearer(id))).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["id"], id);
            assert_eq!(body["role"], role);
        }
    }

    #[tokio::test]
    async fn user_listing_is_admin_only() {
        let (status, body) = get("/api/v1/users", Some(bearer("u2"))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["message"], "Not authorized user");
    }

    #[tokio::test]
    async fn single_user_lookup_is_admin_only() {
        let uri = format!("/api/v1/users/{}", uuid::Uuid::new_v4());

        let (status, body) = get(&uri, Some(bearer("u2"))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["message"], "Not authorized user");

        let (status, body) = get(&uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "MALFORMED_CREDENTIAL");
    }

    #[tokio::test]
    async fn unknown_route_is_not_gated() {
        let (status, _) = get("/api/v1/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn responses_carry_request_id_and_security_headers() {
        let req = Request::builder()
            .uri("/api/v1/me")
            .body(Body::empty())
            .unwrap();
        let res = router().oneshot(req).await.unwrap();

        assert!(res.headers().contains_key("x-request-id"));
        assert_eq!(res.headers()["x-content-type-options"], "nosniff");
        assert_eq!(res.headers()[header::CACHE_CONTROL], "no-store");
    }
}
