//! Sign-in and sign-out route handlers.

use askama::Template;
use axum::{
    Form, Router,
    extract::State,
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::set_current_user;
use crate::models::session_keys;
use crate::notices::{self, Notice};
use crate::state::AppState;

/// Login page template.
#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginPageTemplate {
    notices: Vec<Notice>,
}

/// Sign-in form data.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(login_page).post(login))
        .route("/auth/logout", post(logout))
}

/// Render the login page.
///
/// GET /auth/login
async fn login_page(session: Session) -> Result<Html<String>, AppError> {
    let template = LoginPageTemplate {
        notices: notices::take(&session).await,
    };
    Ok(Html(template.render()?))
}

/// Sign in with email and password.
///
/// POST /auth/login
#[instrument(skip_all)]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, AppError> {
    let password = SecretString::from(form.password);

    match state
        .identity()
        .sign_in_with_password(form.email.trim(), &password)
        .await
    {
        Ok(user) => {
            // New session id on privilege change
            session.cycle_id().await?;
            // Nothing from a previous login carries over
            session.remove_value(session_keys::PANEL).await?;
            set_current_user(&session, &user).await?;
            set_sentry_user(&user.uid, Some(&user.email));
            tracing::info!(uid = %user.uid, is_admin = user.is_admin, "User signed in");
            Ok(Redirect::to("/admin"))
        }
        Err(e) => {
            tracing::info!(error = %e, "Sign-in failed");
            notices::push(&session, Notice::error(e.user_message())).await?;
            Ok(Redirect::to("/auth/login"))
        }
    }
}

/// Sign out and drop the session.
///
/// POST /auth/logout
async fn logout(session: Session) -> impl IntoResponse {
    if let Err(e) = session.flush().await {
        tracing::error!(error = %e, "Failed to sign out");
    }
    clear_sentry_user();

    Redirect::to("/")
}
