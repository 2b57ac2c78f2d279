//! QA Learning API
//!
//! A small user-management service for practising API testing: registration,
//! login with bearer tokens, and CRUD over an in-memory user collection.

pub mod api;
pub mod auth;
pub mod core;
pub mod store;

// Re-export commonly used types
pub use api::{ApiServer, AppState};
pub use crate::core::{ApiError, Config};
pub use store::UserStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
