//! Home page handler.

use askama::Template;
use axum::response::Html;
use tower_sessions::Session;

use crate::{error::AppError, filters, middleware::OptionalUser, notices, notices::Notice};

/// Home page template.
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub notices: Vec<Notice>,
    pub user_email: Option<String>,
    pub is_admin: bool,
}

/// Landing page; shows whatever the last redirect queued.
///
/// GET /
///
/// # Errors
///
/// Returns `AppError::Template` if the page fails to render.
pub async fn home(
    OptionalUser(user): OptionalUser,
    session: Session,
) -> Result<Html<String>, AppError> {
    let template = HomeTemplate {
        notices: notices::take(&session).await,
        is_admin: user.as_ref().is_some_and(|user| user.is_admin),
        user_email: user.map(|user| user.email),
    };

    Ok(Html(template.render()?))
}

/// Liveness health check endpoint.
///
/// GET /health
pub async fn health() -> &'static str {
    "ok"
}
