/*
 * Responsibility
 * - read-only /users handlers (admin gate in front, see routes)
 * - users are addressed by their UUID directly
 */
use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{
    api::v1::{dto::users::UserResponse, extractors::AuthUser},
    error::AppError,
    repos::user_repo,
    state::AppState,
};

pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(admin): AuthUser,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let rows = user_repo::list(&state.db).await?;

    let res = rows
        .into_iter()
        .map(UserResponse::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(admin = %admin.id, count = res.len(), "listed users");
    Ok(Json(res))
}

pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(admin): AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let row = user_repo::get(&state.db, user_id)
        .await?
        .ok_or(AppError::not_found("user"))?;

    tracing::debug!(admin = %admin.id, %user_id, "fetched user");
    Ok(Json(UserResponse::try_from(row)?))
}
