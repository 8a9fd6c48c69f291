//! Client for the roles backend.
//!
//! The backend exposes two `POST` endpoints, both authenticated with the
//! signed-in user's ID token as a bearer token:
//!
//! - `listAdmins` - returns every account holding the admin role
//! - `setAdminRole` - grants the admin role to an email address
//!
//! Failures carry a JSON body with a human-readable `message` and, when the
//! backend provides one, a machine-readable `code`.

mod client;
mod error;

pub use client::{LIST_ADMINS, RolesClient, SET_ADMIN_ROLE};
pub use error::{ErrorCode, RolesError};
