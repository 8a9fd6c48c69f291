//! Session models for the admin panel.

mod session;

pub use session::keys as session_keys;
