//! Admin promotion: grant the role, then reload the roster.

use dashmap::DashSet;
use minik_core::Email;
use tower_sessions::Session;
use tracing::instrument;

use super::roster::load_roster;
use super::token::{self, TokenError};
use super::{PanelState, fail_step};
use crate::error::AppError;
use crate::identity::SignedInUser;
use crate::middleware::auth::NOT_AUTHORIZED;
use crate::notices::{self, Notice};
use crate::state::AppState;

/// Notice for an empty submission.
pub const EMAIL_REQUIRED: &str = "Enter an email address";

/// Notice for a submission while the previous one is still running.
pub const ALREADY_BUSY: &str = "A request is already in progress";

/// Marks a user as busy for as long as it lives.
///
/// Dropping the guard clears the flag, whatever path the request took.
#[derive(Debug)]
pub struct BusyGuard<'a> {
    busy: &'a DashSet<String>,
    key: String,
}

impl<'a> BusyGuard<'a> {
    /// Set the flag for `key`, or `None` if it is already set.
    #[must_use]
    pub fn acquire(busy: &'a DashSet<String>, key: &str) -> Option<Self> {
        busy.insert(key.to_string()).then(|| Self {
            busy,
            key: key.to_string(),
        })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.busy.remove(&self.key);
    }
}

/// Grant the admin role to the address typed into the form.
///
/// Empty or malformed input is refused without a network call. On success
/// the draft is cleared and the roster is reloaded from `listAdmins`; on
/// failure the message is queued and the roster is left alone.
///
/// # Errors
///
/// Returns `AppError::AccessRevoked` on auth failures and
/// `AppError::Session` if the session store fails.
#[instrument(skip_all, fields(uid = %user.uid))]
pub async fn promote(
    state: &AppState,
    session: &Session,
    user: &mut SignedInUser,
    panel: &mut PanelState,
    input: &str,
) -> Result<(), AppError> {
    let input = input.trim();
    panel.email_draft = input.to_string();

    if input.is_empty() {
        notices::push(session, Notice::error(EMAIL_REQUIRED)).await?;
        return Ok(());
    }

    let email = match Email::parse(input) {
        Ok(email) => email,
        Err(e) => {
            notices::push(session, Notice::error(format!("Invalid email address: {e}"))).await?;
            return Ok(());
        }
    };

    let Some(_busy) = BusyGuard::acquire(state.busy(), &user.uid) else {
        notices::push(session, Notice::error(ALREADY_BUSY)).await?;
        return Ok(());
    };

    let token = match token::bearer(state.identity(), session, user).await {
        Ok(token) => token,
        Err(TokenError::Identity(e)) => {
            return fail_step(session, e.user_message(), e.is_rejected()).await;
        }
        Err(TokenError::NotAdmin) => return fail_step(session, NOT_AUTHORIZED, true).await,
        Err(TokenError::Session(e)) => return Err(e.into()),
    };

    match state.roles().set_admin_role(&token, &email).await {
        Ok(message) => {
            tracing::info!(email = %email, "Admin role granted");
            let text = message.unwrap_or_else(|| format!("{email} was granted the admin role"));
            notices::push(session, Notice::success(text)).await?;
            panel.email_draft.clear();
        }
        Err(e) => {
            return fail_step(session, e.user_message(), e.is_auth_failure()).await;
        }
    }

    load_roster(state, session, user, panel).await
}
