//! Bearer-token identity extractors.

use axum::extract::{FromRef, FromRequestParts};
use axum::response::{IntoResponse, Response};
use foodgram_domain::user::UserRole;
use http::StatusCode;
use http::header::AUTHORIZATION;
use http::request::Parts;

use crate::token::validate_access_token;

/// HMAC secret used to validate bearer tokens.
///
/// Service state exposes it through [`FromRef`] so the extractors can reach it.
#[derive(Clone)]
pub struct JwtSecret(pub String);

/// Authenticated caller, taken from `Authorization: Bearer <jwt>`
/// (the `Token <jwt>` scheme is accepted too).
///
/// Rejects with 401 when the header is absent or the token does not validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i32,
    pub user_role: UserRole,
}

impl Identity {
    pub fn is_staff(&self) -> bool {
        self.user_role.is_staff()
    }
}

/// Optional caller: `None` when no `Authorization` header is sent.
///
/// A header that is present but invalid is still rejected with 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaybeIdentity(pub Option<Identity>);

impl MaybeIdentity {
    pub fn user_id(&self) -> Option<i32> {
        self.0.map(|identity| identity.user_id)
    }
}

/// Rejection returned by the identity extractors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    MissingCredentials,
    InvalidToken,
}

impl AuthRejection {
    fn message(self) -> &'static str {
        match self {
            Self::MissingCredentials => "authentication credentials were not provided",
            Self::InvalidToken => "invalid token",
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "kind": "UNAUTHORIZED",
            "message": self.message(),
        });
        (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response()
    }
}

/// Parse the `Authorization` header. `Ok(None)` means no header was sent.
fn identity_from_parts(parts: &Parts, secret: &str) -> Result<Option<Identity>, AuthRejection> {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| AuthRejection::InvalidToken)?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("Token "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthRejection::InvalidToken)?;

    let info = validate_access_token(token, secret).map_err(|e| {
        tracing::debug!(error = %e, "bearer token rejected");
        AuthRejection::InvalidToken
    })?;
    Ok(Some(Identity {
        user_id: info.user_id,
        user_role: info.user_role,
    }))
}

// axum-core 0.5 declares `from_request_parts` as `fn -> impl Future + Send`.
// Values are extracted synchronously and moved into a 'static async block.
impl<S> FromRequestParts<S> for Identity
where
    JwtSecret: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let secret = JwtSecret::from_ref(state);
        let result = identity_from_parts(parts, &secret.0);
        async move { result.and_then(|identity| identity.ok_or(AuthRejection::MissingCredentials)) }
    }
}

impl<S> FromRequestParts<S> for MaybeIdentity
where
    JwtSecret: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let secret = JwtSecret::from_ref(state);
        let result = identity_from_parts(parts, &secret.0);
        async move { result.map(MaybeIdentity) }
    }
}
