//! QA Learning API server

use qa_learning_api::{api, core};

use anyhow::Result;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration (handles CLI args, env vars, and config file)
    let config = match core::config::Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            // Logging isn't initialized yet
            eprintln!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let _logger = match core::Logger::init(&config.logging) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return Err(e);
        }
    };

    info!("Starting QA Learning API v{}", qa_learning_api::VERSION);
    info!(
        host = %config.server.host,
        port = config.server.port,
        "Server configuration"
    );
    info!(
        token_ttl = config.security.token_ttl,
        bcrypt_cost = config.security.bcrypt_cost,
        protect_user_routes = config.security.protect_user_routes,
        "Security configuration"
    );

    if config.security.uses_default_secret() {
        warn!(
            "Using the built-in JWT secret; set {}_SECURITY__JWT_SECRET or security.jwt_secret",
            core::config::ENV_PREFIX
        );
    }

    let server = api::ApiServer::new(config);

    // Blocks until shutdown signal
    server.serve().await?;

    Ok(())
}
