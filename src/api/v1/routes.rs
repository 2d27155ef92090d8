/*
 * Responsibility
 * - the v1 URL layout
 * - which access gate guards which routes
 *   - /health: open
 *   - /me: any registered role
 *   - /users*: admins only
 */
use axum::{Router, routing::get};

use crate::middleware::auth::{AccessGate, access};
use crate::services::auth::{Role, RoleSet};
use crate::state::AppState;

use crate::api::v1::handlers::{
    health::health,
    me::me,
    users::{get_user, list_users},
};

pub fn routes(state: AppState) -> Router<AppState> {
    let members = access::apply(
        Router::new().route("/me", get(me)),
        AccessGate::with_roles(state.auth.clone(), RoleSet::all()),
    );

    let admins = access::apply(
        Router::new()
            .route("/users", get(list_users))
            .route("/users/{user_id}", get(get_user)),
        AccessGate::with_roles(state.auth.clone(), RoleSet::only(Role::Admin)),
    );

    Router::new()
        .route("/health", get(health))
        .merge(members)
        .merge(admins)
}
