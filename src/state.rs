/*
 * Responsibility
 * - the shared context attached to the Router (AppState)
 *   - db pool for handlers, AuthService for building access gates
 * - cheap to Clone (Arc / pool handles inside)
 */
use std::sync::Arc;

use crate::services::auth::AuthService;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(db: sqlx::PgPool, auth: Arc<AuthService>) -> Self {
        Self { db, auth }
    }
}
