//! Per-session panel state.

use minik_core::Roster;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::models::session_keys;

/// What the panel remembers between requests for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelState {
    /// Roster as last fetched; empty until the first successful load.
    pub roster: Roster,
    /// Text in the promotion form's email field.
    pub email_draft: String,
}

impl PanelState {
    /// Read the state, or a fresh one if the session has none.
    ///
    /// # Errors
    ///
    /// Returns the session store error.
    pub async fn load(session: &Session) -> Result<Self, tower_sessions::session::Error> {
        Ok(session.get(session_keys::PANEL).await?.unwrap_or_default())
    }

    /// # Errors
    ///
    /// Returns the session store error.
    pub async fn save(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.insert(session_keys::PANEL, self).await
    }
}
