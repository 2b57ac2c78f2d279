//! Authentication module
//!
//! - User registration and login
//! - JWT token generation and validation
//! - Password hashing and verification
//! - Bearer-token middleware

pub mod jwt;
pub mod password;
pub mod handlers;
pub mod middleware;
pub mod models;

pub use jwt::{Claims, TokenError, TokenService};
pub use password::{hash_password, verify_password};
pub use middleware::{authenticate, AuthUser};
pub use handlers::{register, login};
