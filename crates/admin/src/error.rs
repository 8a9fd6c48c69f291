//! Unified error handling for admin.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

/// Application-level error type for the admin panel.
///
/// Failures the user can act on are reported through notices; this type only
/// covers what ends the request.
#[derive(Debug, Error)]
pub enum AppError {
    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The user lost access mid-request; the notice is already queued.
    #[error("Access revoked")]
    AccessRevoked,

    /// A page template failed to render.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::Session(_) | Self::Template(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        match self {
            Self::AccessRevoked => Redirect::to("/").into_response(),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
            // Don't expose internal error details to clients
            Self::Session(_) | Self::Template(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Set the Sentry user context from the signed-in user.
pub fn set_sentry_user(uid: &str, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(uid.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::header::LOCATION;

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("section 'reports'".to_string());
        assert_eq!(err.to_string(), "Not found: section 'reports'");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Template(askama::Error::Fmt)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(get_status(AppError::AccessRevoked), StatusCode::SEE_OTHER);
    }

    #[test]
    fn test_access_revoked_redirects_home() {
        let response = AppError::AccessRevoked.into_response();
        assert_eq!(response.headers()[LOCATION], "/");
    }

    #[tokio::test]
    async fn test_render_failure_is_a_hidden_500() {
        let response = AppError::from(askama::Error::Fmt).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Internal server error");
    }
}
