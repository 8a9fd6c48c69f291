//! Roster loading.

use tower_sessions::Session;
use tracing::instrument;

use super::token::{self, TokenError};
use super::{PanelState, fail_step};
use crate::error::AppError;
use crate::identity::SignedInUser;
use crate::middleware::auth::NOT_AUTHORIZED;
use crate::state::AppState;

/// Fetch `listAdmins` and replace the roster with the result.
///
/// On failure the roster is left as it was and the message is queued. Auth
/// failures (a rejected refresh, or an unauthenticated / permission-denied
/// answer from the backend) end the request with `AppError::AccessRevoked`.
///
/// # Errors
///
/// Returns `AppError::AccessRevoked` on auth failures and
/// `AppError::Session` if the session store fails.
#[instrument(skip_all, fields(uid = %user.uid))]
pub async fn load_roster(
    state: &AppState,
    session: &Session,
    user: &mut SignedInUser,
    panel: &mut PanelState,
) -> Result<(), AppError> {
    let token = match token::bearer(state.identity(), session, user).await {
        Ok(token) => token,
        Err(TokenError::Identity(e)) => {
            return fail_step(session, e.user_message(), e.is_rejected()).await;
        }
        Err(TokenError::NotAdmin) => return fail_step(session, NOT_AUTHORIZED, true).await,
        Err(TokenError::Session(e)) => return Err(e.into()),
    };

    match state.roles().list_admins(&token).await {
        Ok(roster) => {
            tracing::debug!(admins = roster.len(), "Roster loaded");
            panel.roster = roster;
            Ok(())
        }
        Err(e) => fail_step(session, e.user_message(), e.is_auth_failure()).await,
    }
}
