pub mod access_token;
pub mod directory;
pub mod factory;
pub mod principal;
pub mod role;

pub use access_token::{AuthService, TokenClaims};
pub use directory::{PgUserDirectory, PrincipalDirectory};
pub use factory::build_auth_service;
pub use principal::Principal;
pub use role::{GateConfigError, Role, RoleSet};
