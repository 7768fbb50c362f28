//! services/api/src/web/auth.rs
//!
//! Authentication endpoints: login, token refresh and the current-user lookup.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use oceanus_core::ports::PortError;
use std::sync::Arc;
use tracing::{info, warn};

use crate::adapters::token::{REMEMBER_ME_SECS, SHORT_LIVED_SECS};
use crate::error::{ApiError, ApiResult};
use crate::web::middleware::authenticate;
use crate::web::protocol::{LoginRequest, LoginResponse, MessageBody, RefreshResponse, UserView};
use crate::web::state::AppState;

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/auth/login - Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid request data", body = MessageBody),
        (status = 401, description = "Invalid credentials", body = MessageBody)
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    // 1. Validate the body shape
    let Json(req) = payload.map_err(|_| ApiError::bad_request("Invalid request data"))?;
    if !req.email.contains('@') || req.password.is_empty() {
        return Err(ApiError::bad_request("Invalid request data"));
    }

    // 2. Look the user up and compare the password
    let user = match state.users.get_user_by_email(&req.email).await {
        Ok(user) if user.password == req.password => user,
        Ok(_) | Err(PortError::NotFound(_)) => {
            warn!("Rejected login for {}", req.email);
            return Err(ApiError::unauthorized("Invalid credentials"));
        }
        Err(e) => return Err(e.into()),
    };

    // 3. Record the login and mint a token
    let now = Utc::now();
    state.users.record_login(user.id, now).await?;

    let expires_in = if req.remember_me {
        REMEMBER_ME_SECS
    } else {
        SHORT_LIVED_SECS
    };
    let token = state
        .tokens
        .issue(&user, expires_in, now)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    info!("User {} logged in as {}", user.id, user.role);
    Ok(Json(LoginResponse {
        token,
        role: user.role,
        expires_in,
        user: user.public().into(),
    }))
}

/// POST /api/auth/refresh - Exchange a valid token for a fresh one
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    responses(
        (status = 200, description = "Token refreshed", body = RefreshResponse),
        (status = 401, description = "Missing or invalid token", body = MessageBody)
    ),
    security(("bearer" = []))
)]
pub async fn refresh_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    let user = authenticate(&state, &headers).await?;
    let token = state
        .tokens
        .issue(&user, SHORT_LIVED_SECS, Utc::now())
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(RefreshResponse {
        token,
        expires_in: SHORT_LIVED_SECS,
    }))
}

/// GET /api/auth/me - The user behind the bearer token
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserView),
        (status = 401, description = "Missing or invalid token", body = MessageBody)
    ),
    security(("bearer" = []))
)]
pub async fn me_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<UserView>> {
    let user = authenticate(&state, &headers).await?;
    Ok(Json(user.public().into()))
}
