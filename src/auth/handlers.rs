//! Authentication API handlers

use crate::api::handlers::AppState;
use crate::api::models::{LenientJson, UserSummary};
use crate::auth::models::{LoginRequest, LoginResponse, RegisterRequest};
use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::core::error::{ApiError, Result};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

/// Handler for POST /api/register - User registration
pub async fn register(
    State(state): State<AppState>,
    LenientJson(req): LenientJson<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let username = req.username.unwrap_or_default();
    let password = req.password.unwrap_or_default();

    tracing::info!(username = %username, "User registration attempt");

    // Hash before touching the store so the lock is never held across bcrypt
    let password_hash = hash_password_blocking(password, state.bcrypt_cost).await?;
    let user = state.users.append(username, password_hash).await;

    tracing::info!(user_id = user.id, username = %user.username, "User registered successfully");

    Ok((StatusCode::CREATED, Json(UserSummary::from(user))))
}

/// Handler for POST /api/login - User login
pub async fn login(
    State(state): State<AppState>,
    LenientJson(req): LenientJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let username = req.username.unwrap_or_default();
    let password = req.password.unwrap_or_default();

    tracing::info!(username = %username, "Login attempt");

    let user = match state.users.find_by_username(&username).await {
        Some(u) => u,
        None => {
            tracing::warn!(username = %username, "Unknown username");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !verify_password_blocking(password, user.password_hash).await? {
        tracing::warn!(username = %username, "Invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = state.tokens.issue(&user.username)?;

    tracing::info!(user_id = user.id, username = %user.username, "Login successful");

    Ok(Json(LoginResponse { token }))
}
