//! User handlers
//!
//! Listing needs a verified token; the by-id routes are gated by the router
//! according to `security.protect_user_routes`.

use super::AppState;
use crate::api::models::{LenientJson, UpdateUserRequest, UserSummary};
use crate::auth::middleware::AuthUser;
use crate::core::error::{ApiError, Result};
use axum::{
    extract::{Path, State},
    Json,
};

/// Read the id from the leading digits of the path segment, after optional
/// whitespace and sign, so `1abc` and `1.5` both address user 1.
///
/// Segments without leading digits, negative values and values past `u64`
/// can never have been issued and resolve to the same 404 as an unknown id.
fn parse_user_id(raw: &str) -> Result<u64> {
    let trimmed = raw.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..digits_end];

    if digits.is_empty() {
        return Err(ApiError::user_not_found());
    }

    let id = digits.parse::<u64>().map_err(|_| ApiError::user_not_found())?;
    if negative && id != 0 {
        return Err(ApiError::user_not_found());
    }

    Ok(id)
}

/// Handler for GET /api/users - List all users (bearer token required)
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthUser,
) -> Json<Vec<UserSummary>> {
    let users: Vec<UserSummary> = state
        .users
        .list_all()
        .await
        .into_iter()
        .map(UserSummary::from)
        .collect();

    tracing::info!(
        requested_by = %user.username,
        token_issued_at = user.issued_at,
        token_expires_at = user.expires_at,
        count = users.len(),
        "Listing users"
    );

    Json(users)
}

/// Handler for GET /api/users/:id - Get a single user
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserSummary>> {
    let id = parse_user_id(&user_id)?;

    let user = state
        .users
        .find_by_id(id)
        .await
        .ok_or_else(ApiError::user_not_found)?;

    Ok(Json(UserSummary::from(user)))
}

/// Handler for PUT /api/users/:id - Replace the username
///
/// An absent `name` replaces the username with the empty string.
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    LenientJson(req): LenientJson<UpdateUserRequest>,
) -> Result<String> {
    let id = parse_user_id(&user_id)?;
    let name = req.name.unwrap_or_default();

    let user = state
        .users
        .update_username(id, name)
        .await
        .ok_or_else(ApiError::user_not_found)?;

    tracing::info!(user_id = id, username = %user.username, "User updated");

    Ok(format!("User {} updated to {}", id, user.username))
}

/// Handler for PATCH /api/users/:id - Update the username if one is given
///
/// A missing or empty `name` leaves the record untouched.
pub async fn patch_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    LenientJson(req): LenientJson<UpdateUserRequest>,
) -> Result<String> {
    let id = parse_user_id(&user_id)?;

    let user = match req.name.filter(|n| !n.is_empty()) {
        Some(name) => state.users.update_username(id, name).await,
        None => state.users.find_by_id(id).await,
    }
    .ok_or_else(ApiError::user_not_found)?;

    tracing::info!(user_id = id, username = %user.username, "User partially updated");

    Ok(format!("User {} partially updated to {}", id, user.username))
}

/// Handler for DELETE /api/users/:id - Delete a user
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<String> {
    let id = parse_user_id(&user_id)?;

    if !state.users.remove(id).await {
        return Err(ApiError::user_not_found());
    }

    tracing::info!(user_id = id, "User deleted");

    Ok(format!("User {} deleted successfully", id))
}
