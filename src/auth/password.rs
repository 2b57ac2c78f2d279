//! Password hashing and verification using bcrypt

use crate::core::error::{ApiError, Result};

/// Cost used when nothing else is configured
pub const DEFAULT_COST: u32 = 10;

/// Hash a password using bcrypt. The salt is random and embedded in the output.
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    bcrypt::hash(password, cost)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a hash. An unparseable hash is a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match bcrypt::verify(password, hash) {
        Ok(valid) => valid,
        Err(e) => {
            tracing::debug!(error = %e, "Stored hash could not be verified");
            false
        }
    }
}

/// [`hash_password`] on the blocking pool
pub async fn hash_password_blocking(password: String, cost: u32) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password, cost))
        .await
        .map_err(|e| ApiError::Internal(format!("Password hashing task failed: {}", e)))?
}

/// [`verify_password`] on the blocking pool
pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| ApiError::Internal(format!("Password verification task failed: {}", e)))
}
