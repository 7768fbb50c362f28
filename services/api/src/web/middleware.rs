//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use oceanus_core::domain::User;
use std::sync::Arc;
use tracing::warn;

use crate::error::{ApiError, ApiResult};
use crate::web::state::AppState;

/// The authenticated caller, inserted into request extensions by [`require_auth`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

/// Returns the token of an `Authorization: Bearer <token>` header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Verifies the bearer token and resolves its subject to a known user.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> ApiResult<User> {
    let token =
        bearer_token(headers).ok_or_else(|| ApiError::unauthorized("No token provided"))?;

    let claims = state.tokens.verify(token, Utc::now()).map_err(|e| {
        warn!("Rejected bearer token: {}", e);
        ApiError::unauthorized("Invalid token")
    })?;

    state.users.get_user(claims.sub).await.map_err(|e| {
        warn!("Token subject {} did not resolve: {}", claims.sub, e);
        ApiError::unauthorized("Invalid token")
    })
}

/// Middleware that validates the bearer token and loads the caller.
///
/// If valid, inserts an [`AuthUser`] into request extensions for handlers to use.
/// If invalid or missing, returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(&state, req.headers()).await?;
    req.extensions_mut().insert(AuthUser(user));
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_requires_the_scheme() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer v1.a.b"));
        assert_eq!(bearer_token(&headers), Some("v1.a.b"));
    }
}
