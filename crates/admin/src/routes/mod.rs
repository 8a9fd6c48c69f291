//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home, shows queued notices
//! GET  /health                 - Liveness check
//!
//! # Auth
//! GET  /auth/login             - Sign-in page
//! POST /auth/login             - Sign in with email and password
//! POST /auth/logout            - Sign out
//!
//! # Panel (admins only)
//! GET  /admin                  - Users section
//! GET  /admin/{section}        - Named section
//! POST /admin/users            - Grant the admin role to an email
//! ```

use axum::{Router, routing::get};

use crate::state::AppState;

pub mod auth;
pub mod home;
pub mod panel;

/// Build all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(home::health))
        .merge(auth::router())
        .merge(panel::router())
}
