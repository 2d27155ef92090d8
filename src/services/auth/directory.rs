//! Principal lookup used by the access gate.
//!
//! The gate only needs "find the user this token names"; the store behind it
//! owns pooling and timeouts. Lookups are per request and never cached.
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::repos::{error::RepoError, user_repo};
use crate::services::auth::{Principal, Role};

#[async_trait]
pub trait PrincipalDirectory: Send + Sync + 'static {
    // Ok(None) when no registered user carries this id.
    async fn find_by_id(&self, id: &str) -> Result<Option<Principal>, RepoError>;
}

/// `users` table backed directory.
#[derive(Clone, Debug)]
pub struct PgUserDirectory {
    db: PgPool,
}

impl PgUserDirectory {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PrincipalDirectory for PgUserDirectory {
    async fn find_by_id(&self, id: &str) -> Result<Option<Principal>, RepoError> {
        // User ids are UUIDs; anything else cannot name a registered user.
        let Ok(user_id) = Uuid::parse_str(id) else {
            return Ok(None);
        };

        let Some(row) = user_repo::find_principal(&self.db, user_id).await? else {
            return Ok(None);
        };

        let role = row
            .role
            .parse::<Role>()
            .map_err(|e| RepoError::InvalidRole(e.0))?;

        Ok(Some(Principal {
            id: row.id.to_string(),
            email: row.email,
            user_name: row.user_name,
            role,
        }))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    #[tokio::test]
    async fn non_uuid_id_is_not_found_without_touching_the_database() {
        // Lazy pool: any real query would fail to connect.
        let db = PgPoolOptions::new()
            .connect_lazy("postgres://nobody@127.0.0.1:1/none")
            .unwrap();
        let directory = PgUserDirectory::new(db);

        assert_eq!(directory.find_by_id("u1").await.unwrap(), None);
        assert_eq!(directory.find_by_id("").await.unwrap(), None);
    }
}
