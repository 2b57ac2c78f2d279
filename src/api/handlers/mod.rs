pub mod users;

pub use users::*;

use crate::auth::jwt::TokenService;
use crate::core::config::SecurityConfig;
use crate::store::UserStore;
use std::sync::Arc;

/// Shared application state for handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserStore>,
    pub tokens: Arc<TokenService>,
    pub bcrypt_cost: u32,
    pub protect_user_routes: bool,
}

impl AppState {
    /// Fresh state with an empty user store
    pub fn new(security: &SecurityConfig) -> Self {
        Self {
            users: Arc::new(UserStore::new()),
            tokens: Arc::new(TokenService::new(&security.jwt_secret, security.token_ttl)),
            bcrypt_cost: security.bcrypt_cost,
            protect_user_routes: security.protect_user_routes,
        }
    }
}
