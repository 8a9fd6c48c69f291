//! Identity provider integration.
//!
//! Users sign in with email and password against the provider's account API
//! and receive a short-lived ID token plus a refresh token. The ID token is
//! the bearer credential for the roles backend; its custom claims carry the
//! admin flag.
//!
//! # Architecture
//!
//! - [`IdentityClient`] talks to the provider (`signInWithPassword`, `token`)
//! - [`SignedInUser`] is what the session stores between requests
//! - [`TokenClaims`] reads the admin flag out of an ID token

mod claims;
mod client;
mod user;

pub use claims::TokenClaims;
pub use client::{IdentityClient, TokenGrant};
pub use user::SignedInUser;

use thiserror::Error;

/// Errors that can occur when talking to the identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider refused the request (bad credentials, revoked token).
    #[error("Identity provider rejected the request: {reason}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Provider error code, e.g. `INVALID_LOGIN_CREDENTIALS`.
        reason: String,
    },

    /// Response could not be parsed.
    #[error("Identity response error: {0}")]
    Response(String),

    /// The ID token is not a readable JWT.
    #[error("Invalid ID token: {0}")]
    InvalidToken(String),
}

impl IdentityError {
    /// Whether the provider refused the credentials or refresh token.
    ///
    /// A rejected refresh token cannot recover; the user must sign in again.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::InvalidToken(_))
    }

    /// Text to show the user, keyed on the provider's error code.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { reason, .. } => {
                // Codes may carry a detail suffix: "TOO_MANY_ATTEMPTS_TRY_LATER : ..."
                let code = reason.split_whitespace().next().unwrap_or_default();
                match code {
                    "INVALID_LOGIN_CREDENTIALS" | "INVALID_PASSWORD" | "EMAIL_NOT_FOUND"
                    | "INVALID_EMAIL" => "Invalid email or password".to_string(),
                    "USER_DISABLED" => "This account has been disabled".to_string(),
                    "TOO_MANY_ATTEMPTS_TRY_LATER" => {
                        "Too many attempts, please try again later".to_string()
                    }
                    _ => "Your session has expired, please sign in again".to_string(),
                }
            }
            Self::InvalidToken(_) => "Your session has expired, please sign in again".to_string(),
            Self::Http(_) => "Could not reach the sign-in service".to_string(),
            Self::Response(_) => "Unexpected response from the sign-in service".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(reason: &str) -> IdentityError {
        IdentityError::Rejected {
            status: 400,
            reason: reason.to_string(),
        }
    }

    #[test]
    fn test_credential_codes_map_to_one_message() {
        for code in ["INVALID_LOGIN_CREDENTIALS", "INVALID_PASSWORD", "EMAIL_NOT_FOUND"] {
            assert_eq!(rejected(code).user_message(), "Invalid email or password");
        }
    }

    #[test]
    fn test_code_with_detail_suffix() {
        let err = rejected("TOO_MANY_ATTEMPTS_TRY_LATER : Access disabled temporarily");
        assert_eq!(
            err.user_message(),
            "Too many attempts, please try again later"
        );
    }

    #[test]
    fn test_refresh_rejections_ask_for_sign_in() {
        for code in ["TOKEN_EXPIRED", "INVALID_REFRESH_TOKEN", "USER_NOT_FOUND"] {
            let err = rejected(code);
            assert!(err.is_rejected());
            assert_eq!(
                err.user_message(),
                "Your session has expired, please sign in again"
            );
        }
    }

    #[test]
    fn test_response_errors_are_not_rejections() {
        assert!(!IdentityError::Response("eof".to_string()).is_rejected());
    }
}
