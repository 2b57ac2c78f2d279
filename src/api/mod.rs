//! REST API module
//!
//! - HTTP server and routing
//! - User handlers
//! - Request-id tracing middleware
//! - Request/response models
//! - OpenAPI document and documentation page

pub mod server;
pub mod routes;
pub mod middleware;
pub mod handlers;
pub mod models;
pub mod docs;

pub use server::ApiServer;
pub use handlers::AppState;
pub use models::UserSummary;
pub use middleware::{request_id_middleware, RequestId, REQUEST_ID_HEADER};
