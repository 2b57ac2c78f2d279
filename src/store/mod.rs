//! In-memory user storage
//!
//! State lives for the lifetime of the process and starts empty on every
//! start. There is no persistence.

pub mod models;
pub mod repository;

pub use models::User;
pub use repository::UserStore;
