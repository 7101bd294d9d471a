//! # Server - Roster HTTP API
//!
//! An axum router over a single [`UserService`].
//!
//! ## Routes
//!
//! ```text
//! GET    /                 liveness probe
//! GET    /api/users        list users
//! GET    /api/users/:id    one user           (400 bad id, 404)
//! POST   /api/users        create user        (409 email taken, 422 invalid)
//! PUT    /api/users/:id    partial update     (400, 404, 409, 422)
//! DELETE /api/users/:id    delete user        (400, 404)
//! *                        404 Route not found
//! ```
//!
//! ## Concurrency
//!
//! The service sits behind one `std::sync::Mutex`, and every call into it runs
//! on tokio's blocking pool. Requests are therefore serialized against the
//! table file within this process. Nothing protects the file from other
//! processes.
pub mod error;
pub mod logging;
mod routes;
pub mod security;

pub use error::ApiError;

use axum::Router;
use service::UserService;
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    users: Arc<Mutex<UserService>>,
    /// Send internal error text to clients (off in production).
    expose_errors: bool,
}

impl AppState {
    pub fn new(users: UserService, production: bool) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
            expose_errors: !production,
        }
    }

    /// Runs `f` against the service on the blocking pool and maps its error.
    pub(crate) async fn run<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut UserService) -> service::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let users = Arc::clone(&self.users);
        let expose = self.expose_errors;

        tokio::task::spawn_blocking(move || {
            let mut guard = users
                .lock()
                .map_err(|_| ApiError::internal("user service lock poisoned", expose))?;
            f(&mut *guard).map_err(|e| ApiError::from_service(e, expose))
        })
        .await
        .map_err(|e| ApiError::internal(e.to_string(), expose))?
    }
}

/// Builds the full application: routes, 404 fallback, security headers,
/// request tracing, CORS.
pub fn app(state: AppState) -> Router {
    security::with_security_headers(routes::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
