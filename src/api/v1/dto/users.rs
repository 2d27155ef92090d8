/*
 * Responsibility
 * - response DTOs for the admin user listing
 */
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::repos::{error::RepoError, user_repo::UserRow};
use crate::services::auth::Role;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub user_name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for UserResponse {
    type Error = RepoError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse::<Role>()
            .map_err(|e| RepoError::InvalidRole(e.0))?;

        Ok(Self {
            id: row.id,
            user_name: row.user_name,
            email: row.email,
            role,
            created_at: row.created_at,
        })
    }
}
