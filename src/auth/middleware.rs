//! Authentication middleware

use crate::api::handlers::AppState;
use crate::auth::jwt::Claims;
use crate::core::error::{ApiError, Result};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Decoded token claim attached to an authenticated request
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub username: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.username,
            issued_at: claims.iat,
            expires_at: claims.exp,
        }
    }
}

/// Pull the credential out of `Authorization: <scheme> <token>`.
///
/// The token is whatever follows the first space, so `Bearer` alone counts as
/// missing while `Bearer ` yields an empty (and therefore invalid) token.
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.split(' ').nth(1))
}

/// Authentication middleware: 401 without a credential, 403 when it fails
/// verification, otherwise the claim is stored in request extensions.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match extract_token(request.headers()) {
        Some(t) => t,
        None => return ApiError::Unauthorized.into_response(),
    };

    let claims = match state.tokens.verify(token) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(reason = %e, "Token rejected");
            return ApiError::Forbidden.into_response();
        }
    };

    tracing::debug!(username = %claims.username, "Request authenticated");
    request.extensions_mut().insert(AuthUser::from(claims));

    next.run(request).await
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(ApiError::Unauthorized)
    }
}
