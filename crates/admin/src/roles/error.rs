//! Roles backend errors.

use thiserror::Error;

/// Default notice when the backend gives no message for a failed list.
pub(super) const LIST_FAILED: &str = "Could not load the admin list";

/// Default notice when the backend gives no message for a failed grant.
pub(super) const GRANT_FAILED: &str = "Could not grant the admin role";

/// Structured error code reported by the roles backend.
///
/// Codes are matched case-insensitively with `-` and `_` treated alike, so
/// `permission-denied` and `PERMISSION_DENIED` are the same code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    /// The bearer token is missing, expired, or invalid.
    Unauthenticated,
    /// The caller is authenticated but not an admin.
    PermissionDenied,
    /// The request was malformed (e.g. unknown email).
    InvalidArgument,
    /// The target account does not exist.
    NotFound,
    /// Any other code, kept verbatim.
    Other(String),
}

impl ErrorCode {
    /// Parse a wire code.
    #[must_use]
    pub fn parse(code: &str) -> Self {
        let normalized = code.trim().to_ascii_uppercase().replace('-', "_");
        match normalized.as_str() {
            "UNAUTHENTICATED" => Self::Unauthenticated,
            "PERMISSION_DENIED" => Self::PermissionDenied,
            "INVALID_ARGUMENT" => Self::InvalidArgument,
            "NOT_FOUND" => Self::NotFound,
            _ => Self::Other(code.to_string()),
        }
    }

    /// Whether the code means the caller must re-authenticate or lacks the role.
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthenticated | Self::PermissionDenied)
    }
}

/// Errors that can occur when calling the roles backend.
#[derive(Debug, Error)]
pub enum RolesError {
    /// HTTP request failed before a response arrived.
    #[error("Roles request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    ///
    /// Displays as the backend's message alone, which is what the user sees.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Structured code, when the backend sent one.
        code: Option<ErrorCode>,
        /// Backend message, or a default when the body had none.
        message: String,
    },

    /// The success body could not be parsed.
    #[error("Roles response error: {0}")]
    Response(String),
}

impl RolesError {
    /// Whether the failure means the user is not (or no longer) allowed in.
    ///
    /// Decided on the structured code when present, otherwise on the
    /// 401/403 status. The message text is never inspected.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Self::Api {
                code: Some(code), ..
            } => code.is_auth_failure(),
            Self::Api { status, .. } => matches!(status, 401 | 403),
            Self::Http(_) | Self::Response(_) => false,
        }
    }

    /// Text to show the user.
    ///
    /// Backend messages are shown verbatim; transport details are not.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            Self::Http(_) => "Could not reach the roles service".to_string(),
            Self::Response(_) => "Unexpected response from the roles service".to_string(),
        }
    }
}
