//! Access gate: bearer credential → verified claims → registered user → role check.
//!
//! The stages run strictly in order and the first failure ends the request
//! with its own `GateError`. Only when every stage passes is the `Principal`
//! put into the request extensions, where `AuthUser` picks it up.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::middleware::auth::GateError;
use crate::services::auth::{
    AuthService, GateConfigError, Principal, Role, RoleSet, TokenClaims,
};

/// Request interceptor closed over the roles it lets through.
///
/// Immutable once built; clones share the same `AuthService`.
#[derive(Clone, Debug)]
pub struct AccessGate {
    auth: Arc<AuthService>,
    accepted_roles: RoleSet,
}

impl AccessGate {
    /// Gate that accepts plain users only.
    pub fn new(auth: Arc<AuthService>) -> Self {
        Self::with_roles(auth, RoleSet::default())
    }

    pub fn with_roles(auth: Arc<AuthService>, accepted_roles: RoleSet) -> Self {
        Self {
            auth,
            accepted_roles,
        }
    }

    pub fn try_with_roles(
        auth: Arc<AuthService>,
        roles: impl IntoIterator<Item = Role>,
    ) -> Result<Self, GateConfigError> {
        Ok(Self::with_roles(auth, RoleSet::try_from_roles(roles)?))
    }

    /// Run the full pipeline against the request headers.
    pub async fn authorize(&self, headers: &HeaderMap) -> Result<Principal, GateError> {
        let token = extract_token(headers, self.auth.bearer_prefix()).inspect_err(|_| {
            tracing::warn!("authorization header missing or without the bearer prefix");
        })?;

        let payload = self.auth.verify(token).map_err(|err| {
            tracing::warn!(error = %err, "access token verification failed");
            GateError::InvalidSignature
        })?;

        let claims = TokenClaims::try_from(payload).map_err(|err| {
            tracing::warn!(error = %err, "access token payload rejected");
            GateError::InvalidClaims
        })?;
        if !claims.is_logged_in {
            tracing::warn!(user_id = %claims.id, "access token belongs to a closed session");
            return Err(GateError::InvalidClaims);
        }

        let principal = self
            .auth
            .directory()
            .find_by_id(&claims.id)
            .await
            .map_err(|err| {
                tracing::error!(error = ?err, user_id = %claims.id, "principal lookup failed");
                GateError::LookupFailed(err)
            })?
            .ok_or_else(|| {
                tracing::warn!(user_id = %claims.id, "token names no registered user");
                GateError::PrincipalNotFound
            })?;

        if !self.accepted_roles.contains(principal.role) {
            tracing::warn!(
                user_id = %principal.id,
                role = %principal.role,
                accepted = ?self.accepted_roles,
                "role not accepted"
            );
            return Err(GateError::Forbidden);
        }

        tracing::debug!(user_id = %principal.id, role = %principal.role, "request authorized");
        Ok(principal)
    }
}

/// Strip the configured prefix from the front of the `authorization` header.
///
/// The match is literal and anchored at the start; the prefix is removed
/// once, so a token that happens to contain the prefix text stays intact.
fn extract_token<'a>(headers: &'a HeaderMap, prefix: &str) -> Result<&'a str, GateError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(prefix))
        .ok_or(GateError::MalformedCredential)
}

/// Put `gate` in front of every route registered on `router` so far.
///
/// ```ignore
/// let admin = Router::new().route("/users", get(list_users));
/// let admin = access::apply(admin, AccessGate::with_roles(auth, RoleSet::only(Role::Admin)));
/// ```
pub fn apply<S>(router: Router<S>, gate: AccessGate) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    // route_layer: unmatched paths still 404 instead of being authenticated
    router.route_layer(middleware::from_fn_with_state(gate, access_middleware))
}

async fn access_middleware(
    State(gate): State<AccessGate>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let principal = gate.authorize(req.headers()).await?;

    // middleware → extractor
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}
