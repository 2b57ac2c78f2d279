//! Stored records

/// User record held by the store.
///
/// Deliberately not `Serialize`: responses go through
/// [`UserSummary`](crate::api::models::UserSummary), which has no hash field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub password_hash: String,
}
