use std::{collections::HashSet, fmt, sync::Arc};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::Value;
use thiserror::Error;

use crate::config::AuthConfig;
use crate::services::auth::directory::PrincipalDirectory;

/// Claims the gate relies on, typed.
///
/// `is_logged_in` is false unless the payload carries JSON `true`; the gate
/// rejects such tokens before any lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub id: String,
    pub is_logged_in: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClaimsError {
    #[error("payload is not a JSON object")]
    NotAnObject,
    #[error("'id' claim is missing or not a non-empty string")]
    MissingId,
}

impl TryFrom<Value> for TokenClaims {
    type Error = ClaimsError;

    fn try_from(payload: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut claims) = payload else {
            return Err(ClaimsError::NotAnObject);
        };

        let id = match claims.remove("id") {
            Some(Value::String(id)) if !id.is_empty() => id,
            _ => return Err(ClaimsError::MissingId),
        };

        Ok(Self {
            id,
            is_logged_in: matches!(claims.get("isLoggedIn"), Some(Value::Bool(true))),
        })
    }
}

/// Verifies access tokens and gives the gate its collaborators.
///
/// Tokens are HMAC-signed (HS256/384/512) with the configured signature.
/// `exp`/`nbf` are checked when present; no registered claim is required.
#[derive(Clone)]
pub struct AuthService {
    bearer_prefix: String,
    decoding_key: DecodingKey,
    validation: Validation,
    directory: Arc<dyn PrincipalDirectory>,
}

impl fmt::Debug for AuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("AuthService")
            .field("bearer_prefix", &self.bearer_prefix)
            .field("validation", &self.validation)
            .finish()
    }
}

impl AuthService {
    pub fn new(config: &AuthConfig, directory: Arc<dyn PrincipalDirectory>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.required_spec_claims = HashSet::new();
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.leeway = config.leeway_seconds();

        Self {
            bearer_prefix: config.bearer_prefix().to_string(),
            decoding_key: DecodingKey::from_secret(config.token_signature()),
            validation,
            directory,
        }
    }

    pub fn bearer_prefix(&self) -> &str {
        &self.bearer_prefix
    }

    /// Check the signature (and `exp`/`nbf`) and decode the payload.
    ///
    /// A correctly signed token whose payload is not a claims object comes
    /// back as `Value::Null`, so it is rejected as a payload problem and not
    /// as a signature problem.
    pub fn verify(&self, token: &str) -> Result<Value, jsonwebtoken::errors::Error> {
        match jsonwebtoken::decode::<Value>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Ok(data.claims),
            Err(err) if matches!(err.kind(), ErrorKind::Json(_)) && self.signature_holds(token) => {
                Ok(Value::Null)
            }
            Err(err) => Err(err),
        }
    }

    fn signature_holds(&self, token: &str) -> bool {
        let Ok(header) = jsonwebtoken::decode_header(token) else {
            return false;
        };
        if !self.validation.algorithms.contains(&header.alg) {
            return false;
        }
        let Some((message, signature)) = token.rsplit_once('.') else {
            return false;
        };

        jsonwebtoken::crypto::verify(signature, message.as_bytes(), &self.decoding_key, header.alg)
            .unwrap_or(false)
    }

    pub fn directory(&self) -> &dyn PrincipalDirectory {
        self.directory.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::directory::testing::MemoryDirectory;
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    fn service() -> AuthService {
        let config = AuthConfig::new("Bearer ", "signature", 0).unwrap();
        AuthService::new(&config, Arc::new(MemoryDirectory::default()))
    }

    fn sign(claims: Value, alg: Algorithm, secret: &str) -> String {
        jsonwebtoken::encode(
            &Header::new(alg),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn verifies_every_hmac_variant() {
        let auth = service();
        for alg in [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512] {
            let token = sign(json!({"id": "u1", "isLoggedIn": true}), alg, "signature");
            let claims = auth.verify(&token).unwrap();
            assert_eq!(claims["id"], "u1");
        }
    }

    #[test]
    fn token_without_exp_is_accepted() {
        let token = sign(json!({"id": "u1"}), Algorithm::HS256, "signature");
        assert!(service().verify(&token).is_ok());
    }

    #[test]
    fn expired_token_is_rejected() {
        let exp = chrono::Utc::now().timestamp() - 3600;
        let token = sign(
            json!({"id": "u1", "isLoggedIn": true, "exp": exp}),
            Algorithm::HS256,
            "signature",
        );
        assert!(service().verify(&token).is_err());
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let token = sign(json!({"id": "u1"}), Algorithm::HS256, "someone-else");
        assert!(service().verify(&token).is_err());
    }

    #[test]
    fn garbage_is_rejected_without_panicking() {
        let auth = service();
        for token in ["", "abc.def.ghi", "not-a-jwt", "a.b", "...."] {
            assert!(auth.verify(token).is_err(), "{token:?} should not verify");
        }
    }

    #[test]
    fn not_yet_valid_token_is_rejected() {
        let nbf = chrono::Utc::now().timestamp() + 3600;
        let token = sign(
            json!({"id": "u1", "isLoggedIn": true, "nbf": nbf}),
            Algorithm::HS256,
            "signature",
        );
        assert!(service().verify(&token).is_err());
    }

    #[test]
    fn signed_non_object_payload_is_left_for_claims_validation() {
        let auth = service();
        for payload in [json!("x"), json!(["u1", true]), json!(7)] {
            let token = sign(payload.clone(), Algorithm::HS256, "signature");
            let decoded = auth.verify(&token);
            assert!(decoded.is_ok(), "{payload} should pass signature checks");
            assert!(TokenClaims::try_from(decoded.unwrap()).is_err());
        }
    }

    #[test]
    fn unsigned_non_object_payload_is_still_a_signature_failure() {
        let token = sign(json!("x"), Algorithm::HS256, "someone-else");
        assert!(service().verify(&token).is_err());
    }

    #[test]
    fn claims_require_an_object() {
        for payload in [Value::Null, json!("x"), json!(["u1", true])] {
            assert_eq!(TokenClaims::try_from(payload), Err(ClaimsError::NotAnObject));
        }
    }

    #[test]
    fn claims_require_string_id() {
        for payload in [
            json!({"isLoggedIn": true}),
            json!({"id": "", "isLoggedIn": true}),
            json!({"id": 42, "isLoggedIn": true}),
        ] {
            assert_eq!(TokenClaims::try_from(payload), Err(ClaimsError::MissingId));
        }
    }

    #[test]
    fn liveness_is_true_only_for_json_true() {
        for flag in [json!(false), json!(null), json!("true"), json!(1)] {
            let claims = TokenClaims::try_from(json!({"id": "u1", "isLoggedIn": flag})).unwrap();
            assert!(!claims.is_logged_in);
        }
        let claims = TokenClaims::try_from(json!({"id": "u1"})).unwrap();
        assert!(!claims.is_logged_in);
    }

    #[test]
    fn valid_claims_convert() {
        let claims = TokenClaims::try_from(json!({"id": "u1", "isLoggedIn": true})).unwrap();
        assert_eq!(
            claims,
            TokenClaims {
                id: "u1".into(),
                is_logged_in: true
            }
        );
    }
}
