//! The admin panel workflow.
//!
//! Each step takes the signed-in user and the session's [`PanelState`],
//! talks to the roles backend, and reports back through notices. Handlers
//! save the state afterwards and render it.
//!
//! - [`load_roster`] replaces the roster with a fresh `listAdmins` result
//! - [`promote`] grants the admin role, then reloads the roster
//! - [`token::bearer`] supplies the ID token both steps authenticate with

mod promotion;
mod roster;
mod state;
pub mod token;

pub use promotion::{ALREADY_BUSY, BusyGuard, EMAIL_REQUIRED, promote};
pub use roster::load_roster;
pub use state::PanelState;

use tower_sessions::Session;

use crate::error::AppError;
use crate::notices::{self, Notice};

/// Queue `message` as an error and decide whether the request goes on.
///
/// With `revoke` set the request ends with `AppError::AccessRevoked`, which
/// sends the user home; otherwise the page renders with the notice.
async fn fail_step(
    session: &Session,
    message: impl Into<String>,
    revoke: bool,
) -> Result<(), AppError> {
    notices::push(session, Notice::error(message)).await?;
    if revoke {
        Err(AppError::AccessRevoked)
    } else {
        Ok(())
    }
}
