/*
 * Responsibility
 * - GET /me: echo the principal the access gate resolved
 */
use axum::Json;

use crate::api::v1::extractors::AuthUser;
use crate::services::auth::Principal;

pub async fn me(AuthUser(user): AuthUser) -> Json<Principal> {
    Json(user)
}
