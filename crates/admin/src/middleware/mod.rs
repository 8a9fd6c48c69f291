//! HTTP middleware for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with status and latency)
//! 3. Session layer (tower-sessions, in-memory store)
//! 4. `AdminGuard` extractor on panel routes

pub mod auth;
pub mod session;

pub use auth::{AdminGuard, OptionalUser, clear_current_user, set_current_user};
pub use session::create_session_layer;
