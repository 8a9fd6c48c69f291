//! Access guard and session helpers for the admin panel.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::error::set_sentry_user;
use crate::identity::SignedInUser;
use crate::models::session_keys;
use crate::notices::{self, Notice};

/// Notice queued when a visitor without a session opens the panel.
pub const SIGN_IN_REQUIRED: &str = "You need to sign in to view this page";

/// Notice queued when a signed-in user without the admin flag opens the panel.
pub const NOT_AUTHORIZED: &str = "You are not authorized to view this page";

/// Extractor that requires a signed-in admin.
///
/// Runs on every panel request, so a session that loses its admin flag is
/// turned away on the next request. Rejections queue a notice and redirect
/// home without rendering any panel content.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(AdminGuard { user, .. }: AdminGuard) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
pub struct AdminGuard {
    pub session: Session,
    pub user: SignedInUser,
}

/// Why the guard turned a request away.
#[derive(Debug, PartialEq, Eq)]
pub enum AdminGuardRejection {
    /// No signed-in user.
    SignInRequired,
    /// Signed in, but not an admin.
    NotAuthorized,
    /// The session layer is missing or the store failed.
    SessionUnavailable,
}

impl IntoResponse for AdminGuardRejection {
    fn into_response(self) -> Response {
        match self {
            Self::SignInRequired | Self::NotAuthorized => Redirect::to("/").into_response(),
            Self::SessionUnavailable => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for AdminGuard
where
    S: Send + Sync,
{
    type Rejection = AdminGuardRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AdminGuardRejection::SessionUnavailable)?;

        let user = session
            .get::<SignedInUser>(session_keys::CURRENT_USER)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to read user from session");
                AdminGuardRejection::SessionUnavailable
            })?;

        let (rejection, message) = match user {
            Some(user) if user.is_admin => {
                set_sentry_user(&user.uid, Some(&user.email));
                return Ok(Self { session, user });
            }
            Some(user) => {
                tracing::info!(uid = %user.uid, "Non-admin turned away from panel");
                (AdminGuardRejection::NotAuthorized, NOT_AUTHORIZED)
            }
            None => (AdminGuardRejection::SignInRequired, SIGN_IN_REQUIRED),
        };

        if let Err(e) = notices::push(&session, Notice::error(message)).await {
            tracing::warn!(error = %e, "Failed to queue access notice");
        }

        Err(rejection)
    }
}

/// Extractor that optionally gets the signed-in user.
///
/// Unlike `AdminGuard`, this never rejects; the home page uses it to choose
/// between the sign-in link and the panel link.
pub struct OptionalUser(pub Option<SignedInUser>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<SignedInUser>(session_keys::CURRENT_USER)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(user))
    }
}

/// Helper to store the signed-in user in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &SignedInUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to drop the signed-in user from the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<SignedInUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Request;

    use super::*;
    use crate::testing;

    fn parts_with(session: &Session) -> Parts {
        let (mut parts, ()) = Request::builder()
            .uri("/admin")
            .body(())
            .unwrap()
            .into_parts();
        parts.extensions.insert(session.clone());
        parts
    }

    #[tokio::test]
    async fn test_no_user_is_sent_to_sign_in() {
        let session = testing::session();
        let mut parts = parts_with(&session);

        let rejection = AdminGuard::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();

        assert_eq!(rejection, AdminGuardRejection::SignInRequired);
        assert_eq!(
            notices::take(&session).await,
            vec![Notice::error(SIGN_IN_REQUIRED)]
        );
    }

    #[tokio::test]
    async fn test_non_admin_is_turned_away() {
        let session = testing::session();
        set_current_user(&session, &testing::user(false, testing::FAR_FUTURE))
            .await
            .unwrap();
        let mut parts = parts_with(&session);

        let rejection = AdminGuard::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();

        assert_eq!(rejection, AdminGuardRejection::NotAuthorized);
        assert_eq!(
            notices::take(&session).await,
            vec![Notice::error(NOT_AUTHORIZED)]
        );
    }

    #[tokio::test]
    async fn test_admin_passes() {
        let session = testing::session();
        set_current_user(&session, &testing::user(true, testing::FAR_FUTURE))
            .await
            .unwrap();
        let mut parts = parts_with(&session);

        let guard = AdminGuard::from_request_parts(&mut parts, &())
            .await
            .ok()
            .unwrap();

        assert_eq!(guard.user.uid, "u1");
        assert!(notices::take(&session).await.is_empty());
    }

    #[tokio::test]
    async fn test_signed_out_user_loses_access() {
        let session = testing::session();
        set_current_user(&session, &testing::user(true, testing::FAR_FUTURE))
            .await
            .unwrap();
        clear_current_user(&session).await.unwrap();
        let mut parts = parts_with(&session);

        let rejection = AdminGuard::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();

        assert_eq!(rejection, AdminGuardRejection::SignInRequired);
    }

    #[tokio::test]
    async fn test_missing_session_layer() {
        let (mut parts, ()) = Request::builder().body(()).unwrap().into_parts();

        let rejection = AdminGuard::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();

        assert_eq!(rejection, AdminGuardRejection::SessionUnavailable);
    }

    #[test]
    fn test_rejections_redirect_home() {
        let response = AdminGuardRejection::NotAuthorized.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/");
    }
}
