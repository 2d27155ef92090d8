use serde::Serialize;

use crate::services::auth::Role;

/// The registered user a verified token resolves to.
///
/// Only the projection the gate needs is loaded; the record itself is owned
/// by the user store and never modified here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: String,
    pub email: String,
    pub user_name: String,
    pub role: Role,
}
