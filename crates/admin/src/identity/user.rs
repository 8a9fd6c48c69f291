//! Session-stored identity.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::{IdentityError, TokenClaims, TokenGrant};

/// Seconds before expiry at which the ID token is refreshed.
const REFRESH_MARGIN_SECONDS: i64 = 60;

/// The signed-in user, as stored in the server-side session.
///
/// `is_admin` is re-derived from the ID token's claims every time the token
/// changes, so the access guard always sees the provider's current answer.
#[derive(Clone, Serialize, Deserialize)]
pub struct SignedInUser {
    /// Provider account id.
    pub uid: String,
    pub email: String,
    pub is_admin: bool,
    id_token: String,
    refresh_token: String,
    /// ID token expiry, unix seconds.
    expires_at: i64,
}

impl std::fmt::Debug for SignedInUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedInUser")
            .field("uid", &self.uid)
            .field("email", &self.email)
            .field("is_admin", &self.is_admin)
            .field("id_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl SignedInUser {
    /// Build the user from a fresh token grant.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::InvalidToken` if the ID token cannot be read.
    pub fn from_grant(grant: TokenGrant) -> Result<Self, IdentityError> {
        let claims = TokenClaims::from_id_token(&grant.id_token)?;
        let email = grant
            .email
            .or_else(|| claims.email.clone())
            .unwrap_or_default();

        Ok(Self {
            uid: grant.uid,
            email,
            is_admin: claims.is_admin(),
            id_token: grant.id_token,
            refresh_token: grant.refresh_token,
            expires_at: claims.exp,
        })
    }

    /// Replace the tokens after a refresh and re-read the admin flag.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::InvalidToken` if the new ID token cannot be
    /// read; the user is left unchanged in that case.
    pub fn apply_refresh(&mut self, grant: TokenGrant) -> Result<(), IdentityError> {
        let claims = TokenClaims::from_id_token(&grant.id_token)?;
        self.is_admin = claims.is_admin();
        self.id_token = grant.id_token;
        self.refresh_token = grant.refresh_token;
        self.expires_at = claims.exp;
        Ok(())
    }

    /// Whether the ID token expires within the refresh margin of `now`.
    #[must_use]
    pub const fn needs_refresh(&self, now: i64) -> bool {
        now >= self.expires_at - REFRESH_MARGIN_SECONDS
    }

    /// Current ID token, for use as a bearer credential.
    #[must_use]
    pub fn id_token(&self) -> SecretString {
        SecretString::from(self.id_token.clone())
    }

    #[must_use]
    pub fn refresh_token(&self) -> SecretString {
        SecretString::from(self.refresh_token.clone())
    }
}
