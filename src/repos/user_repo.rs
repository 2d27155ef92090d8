/*
 * Responsibility
 * - read-only SQLx queries against the users table
 * - the table is owned by the user service; nothing here writes to it
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::RepoError;

/// The columns the access gate projects: identity, email, name, role.
#[derive(Debug, FromRow)]
pub struct PrincipalRow {
    #[sqlx(rename = "userId")]
    pub id: Uuid,
    pub email: String,
    #[sqlx(rename = "userName")]
    pub user_name: String,
    pub role: String,
}

#[derive(Debug, FromRow)]
pub struct UserRow {
    #[sqlx(rename = "userId")]
    pub id: Uuid,
    pub email: String,
    #[sqlx(rename = "userName")]
    pub user_name: String,
    pub role: String,
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

pub async fn find_principal(db: &PgPool, user_id: Uuid) -> Result<Option<PrincipalRow>, RepoError> {
    let row = sqlx::query_as::<_, PrincipalRow>(
        r#"
        SELECT "userId", "email", "userName", "role"
        FROM users
        WHERE "userId" = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn list(db: &PgPool) -> Result<Vec<UserRow>, RepoError> {
    let rows = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT "userId", "email", "userName", "role", "createdAt"
        FROM users
        ORDER BY "createdAt" DESC
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn get(db: &PgPool, user_id: Uuid) -> Result<Option<UserRow>, RepoError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT "userId", "email", "userName", "role", "createdAt"
        FROM users
        WHERE "userId" = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}
