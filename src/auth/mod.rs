//! Bearer-token identity resolution.
//!
//! Credential storage and session issuance live in an external system; this
//! service only validates the JWT it is handed and resolves the calling
//! actor's identity and role. The resolved [`AuthContext`] is threaded
//! explicitly into every service call.

pub mod policy;

use std::sync::Arc;

use axum::{
    async_trait,
    body::Body,
    extract::FromRequestParts,
    http::{header, request::Parts, Request},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::entities::UserRole;
use crate::errors::ServiceError;

/// Claims expected in access tokens minted by the external identity service.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the actor's user id, stringified
    pub sub: String,
    /// Actor role, one of the `UserRole` wire values
    pub role: String,
    pub username: Option<String>,
    /// JWT ID
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub nbf: i64,
    pub iss: String,
    pub aud: String,
}

/// The authenticated actor behind a request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub actor_id: i64,
    pub role: UserRole,
    pub username: Option<String>,
}

impl TryFrom<Claims> for AuthContext {
    type Error = ServiceError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let actor_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| ServiceError::Unauthenticated("malformed subject claim".into()))?;
        let role = claims
            .role
            .parse::<UserRole>()
            .map_err(|_| ServiceError::Unauthenticated("unknown role claim".into()))?;

        Ok(AuthContext {
            actor_id,
            role,
            username: claims.username,
        })
    }
}

/// Validates bearer tokens against the configured secret, issuer and audience.
#[derive(Clone)]
pub struct AuthVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthVerifier {
    pub fn new(secret: &str, issuer: &str, audience: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.validate_nbf = true;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn decode(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| ServiceError::Unauthenticated(format!("invalid bearer token: {e}")))
    }
}

/// Makes the verifier available to the [`AuthContext`] extractor on every
/// request.
pub async fn inject_verifier(
    axum::extract::State(verifier): axum::extract::State<Arc<AuthVerifier>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    request.extensions_mut().insert(verifier);
    next.run(request).await
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let verifier = parts
            .extensions
            .get::<Arc<AuthVerifier>>()
            .cloned()
            .ok_or_else(|| {
                ServiceError::InternalError("auth verifier not installed on router".into())
            })?;

        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ServiceError::Unauthenticated("missing bearer token".into()))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ServiceError::Unauthenticated("missing bearer token".into()))?;

        let claims = verifier.decode(token)?;
        AuthContext::try_from(claims)
    }
}
