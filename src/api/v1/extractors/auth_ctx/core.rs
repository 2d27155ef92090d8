use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::Principal;

/// The user the access gate resolved for this request.
///
/// Only available behind `middleware::auth::access::apply`; on a route with no
/// gate the extension is absent and the handler answers 401
/// through `AppError::Unauthenticated`.
pub struct AuthUser(pub Principal);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthenticated)
    }
}
