/**
 * Responsibility
 * - what the repo layer reports upward
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    // The row exists but its role column holds something we do not know.
    #[error("stored role is not recognised: {0}")]
    InvalidRole(String),
}
