//! # roster-server
//!
//! Serves the user API over HTTP. Configuration comes from the environment
//! (see the `config` crate):
//!
//! ```text
//! ROSTER_DB_PATH   table file                     (default: "db/user.json")
//! ROSTER_ADDR      listen address                 (default: "127.0.0.1:3000")
//! ROSTER_ENV       "production" hides error text  (default: "development")
//! ROSTER_LOG       default log level              (default: "info")
//! ROSTER_LOG_JSON  JSON log lines                 (default: "false")
//! ```
//!
//! ## Example
//!
//! ```text
//! $ ROSTER_DB_PATH=/tmp/user.json cargo run -p server
//! $ curl -s localhost:3000/api/users -H 'content-type: application/json' \
//!     -d '{"name":"Ada","username":"ada","email":"ada@example.com"}'
//! {"success":true,"message":"User created","user":{"id":1,...}}
//! ```

use anyhow::{Context, Result};
use config::Config;
use server::{app, logging, AppState};
use service::UserService;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    logging::init(&config.log_level, config.log_json);

    let users = UserService::open(&config.db_path)
        .with_context(|| format!("failed to open user table at {}", config.db_path.display()))?;
    let state = AppState::new(users, config.production);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    tracing::info!(
        addr = %config.addr,
        db = %config.db_path.display(),
        production = config.production,
        "roster server listening"
    );

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("bye");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
