/// Factory: build `AuthService` from the auth settings and the user store.
use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AuthConfig;
use crate::services::auth::{AuthService, PgUserDirectory};

pub fn build_auth_service(config: &AuthConfig, db: PgPool) -> Arc<AuthService> {
    let directory = Arc::new(PgUserDirectory::new(db));

    Arc::new(AuthService::new(config, directory))
}
