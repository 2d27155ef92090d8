use axum::http::StatusCode;
use thiserror::Error;

use crate::repos::error::RepoError;

/// Why the access gate turned a request away.
///
/// Each variant is terminal and maps to one status/message pair so clients
/// can tell "not authenticated" from "account missing" from "not allowed".
#[derive(Debug, Error)]
pub enum GateError {
    #[error("Invalid Bearer key")]
    MalformedCredential,
    #[error("Invalid token")]
    InvalidSignature,
    #[error("Invalid token payload")]
    InvalidClaims,
    #[error("Not registered user")]
    PrincipalNotFound,
    #[error("Not authorized user")]
    Forbidden,
    #[error("internal server error")]
    LookupFailed(#[source] RepoError),
}

impl GateError {
    pub fn status(&self) -> StatusCode {
        match self {
            GateError::MalformedCredential | GateError::InvalidClaims => StatusCode::BAD_REQUEST,
            GateError::InvalidSignature => StatusCode::UNAUTHORIZED,
            GateError::PrincipalNotFound => StatusCode::NOT_FOUND,
            GateError::Forbidden => StatusCode::FORBIDDEN,
            GateError::LookupFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            GateError::MalformedCredential => "MALFORMED_CREDENTIAL",
            GateError::InvalidSignature => "INVALID_SIGNATURE",
            GateError::InvalidClaims => "INVALID_CLAIMS",
            GateError::PrincipalNotFound => "PRINCIPAL_NOT_FOUND",
            GateError::Forbidden => "FORBIDDEN",
            GateError::LookupFailed(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}
