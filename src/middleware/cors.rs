//! CORS for browser clients of the API.
//!
//! Development allows any origin; production only the origins listed in
//! `CORS_ALLOWED_ORIGINS`. Credentials (cookies) are never allowed: callers
//! authenticate with the `authorization` header, which must be allow-listed
//! for preflight to succeed.

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::Config;

pub fn apply(router: Router, config: &Config) -> Router {
    let cors = if config.app_env.is_production() {
        // Empty allowlist → no CORS headers at all.
        let allowed: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        CorsLayer::new().allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _req| allowed.iter().any(|v| v == origin),
        ))
    } else {
        CorsLayer::new().allow_origin(Any)
    }
    .allow_methods([Method::GET, Method::OPTIONS])
    .allow_headers([
        header::AUTHORIZATION,
        header::ACCEPT,
        HeaderName::from_static("x-request-id"),
    ])
    .expose_headers([header::WWW_AUTHENTICATE, HeaderName::from_static("x-request-id")])
    .max_age(std::time::Duration::from_secs(60 * 10));

    router.layer(cors)
}
