//! Session-stored types for the panel.

/// Session keys.
pub mod keys {
    /// Key for the signed-in user (`SignedInUser`).
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the panel's roster and form draft (`PanelState`).
    pub const PANEL: &str = "admin_panel";

    /// Key for the queued flash notices.
    pub const NOTICES: &str = "notices";
}
