//! Bearer token retrieval for roles backend calls.

use secrecy::SecretString;
use thiserror::Error;
use tower_sessions::Session;
use tracing::instrument;

use crate::identity::{IdentityClient, IdentityError, SignedInUser};
use crate::middleware::{clear_current_user, set_current_user};

#[derive(Debug, Error)]
pub enum TokenError {
    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// The refreshed token no longer carries the admin claim.
    #[error("Admin claim revoked")]
    NotAdmin,
}

/// Current ID token for `user`, refreshed first if it is about to expire.
///
/// A refresh re-reads the admin flag and writes the user back to the session.
/// If the provider rejects the refresh token the user is signed out.
///
/// # Errors
///
/// Returns `TokenError::Identity` if the refresh fails,
/// `TokenError::NotAdmin` if the refreshed token lost the admin claim, and
/// `TokenError::Session` if the session cannot be updated.
#[instrument(skip_all, fields(uid = %user.uid))]
pub async fn bearer(
    identity: &IdentityClient,
    session: &Session,
    user: &mut SignedInUser,
) -> Result<SecretString, TokenError> {
    let now = chrono::Utc::now().timestamp();
    if !user.needs_refresh(now) {
        return Ok(user.id_token());
    }

    tracing::debug!("Refreshing ID token");
    let refreshed = match identity.refresh(&user.refresh_token()).await {
        Ok(grant) => user.apply_refresh(grant),
        Err(e) => Err(e),
    };

    if let Err(e) = refreshed {
        if e.is_rejected() {
            tracing::info!(error = %e, "Refresh rejected, signing user out");
            clear_current_user(session).await?;
        }
        return Err(e.into());
    }

    set_current_user(session, user).await?;
    if !user.is_admin {
        tracing::info!("Admin claim gone after refresh");
        return Err(TokenError::NotAdmin);
    }
    Ok(user.id_token())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::models::session_keys;
    use crate::testing;

    #[tokio::test]
    async fn test_fresh_token_is_used_without_refresh() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let identity = IdentityClient::new(&testing::config(&server.uri()).identity);
        let session = testing::session();
        let mut user = testing::user(true, testing::FAR_FUTURE);

        let token = bearer(&identity, &session, &mut user).await.unwrap();

        assert_eq!(token.expose_secret(), user.id_token().expose_secret());
    }

    #[tokio::test]
    async fn test_expiring_token_is_refreshed_and_saved() {
        let server = MockServer::start().await;
        let new_token = testing::jwt(&json!({"sub": "u1", "exp": testing::FAR_FUTURE, "admin": true}));
        Mock::given(method("POST"))
            .and(path("/identity/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id_token": new_token,
                "refresh_token": "r2",
                "user_id": "u1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let identity = IdentityClient::new(&testing::config(&server.uri()).identity);
        let session = testing::session();
        let mut user = testing::user(true, 0);

        let token = bearer(&identity, &session, &mut user).await.unwrap();

        assert_eq!(token.expose_secret(), new_token);
        let stored: SignedInUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.id_token().expose_secret(), new_token);
    }

    #[tokio::test]
    async fn test_refresh_without_admin_claim_is_refused() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/identity/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id_token": testing::jwt(&json!({"sub": "u1", "exp": testing::FAR_FUTURE, "admin": false})),
                "refresh_token": "r2",
                "user_id": "u1"
            })))
            .mount(&server)
            .await;

        let identity = IdentityClient::new(&testing::config(&server.uri()).identity);
        let session = testing::session();
        let mut user = testing::user(true, 0);

        let err = bearer(&identity, &session, &mut user).await.unwrap_err();

        assert!(matches!(err, TokenError::NotAdmin));
        assert!(!user.is_admin);
        let stored: SignedInUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .unwrap()
            .unwrap();
        assert!(!stored.is_admin);
    }

    #[tokio::test]
    async fn test_rejected_refresh_signs_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/identity/token"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"error": {"message": "TOKEN_EXPIRED"}})),
            )
            .mount(&server)
            .await;

        let identity = IdentityClient::new(&testing::config(&server.uri()).identity);
        let session = testing::session();
        let mut user = testing::user(true, 0);
        set_current_user(&session, &user).await.unwrap();

        let err = bearer(&identity, &session, &mut user).await.unwrap_err();

        assert!(matches!(err, TokenError::Identity(ref e) if e.is_rejected()));
        let stored: Option<SignedInUser> = session.get(session_keys::CURRENT_USER).await.unwrap();
        assert!(stored.is_none());
    }
}
