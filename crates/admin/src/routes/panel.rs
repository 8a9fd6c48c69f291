//! Admin panel route handlers.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, State},
    response::Html,
    routing::get,
};
use minik_core::{AdminEntry, MENU, MenuItem, PanelKind, Section};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::{
    error::AppError,
    filters,
    identity::SignedInUser,
    middleware::AdminGuard,
    notices::{self, Notice},
    panel::{self, PanelState},
    state::AppState,
};

/// Side menu entry for templates.
#[derive(Debug, Clone)]
pub struct MenuLinkView {
    pub id: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
    pub href: String,
    pub is_active: bool,
}

impl MenuLinkView {
    fn new(item: &MenuItem, active: Section) -> Self {
        Self {
            id: item.id(),
            title: item.title,
            icon: item.icon,
            href: format!("/admin/{}", item.id()),
            is_active: item.section == active,
        }
    }
}

/// Roster row for templates.
#[derive(Debug, Clone)]
pub struct RosterRowView {
    pub email: String,
    pub role: &'static str,
}

impl From<&AdminEntry> for RosterRowView {
    fn from(entry: &AdminEntry) -> Self {
        Self {
            email: entry.email.to_string(),
            role: entry.role.as_str(),
        }
    }
}

/// Panel page template.
#[derive(Template)]
#[template(path = "panel/index.html")]
pub struct PanelTemplate {
    pub user_email: String,
    pub notices: Vec<Notice>,
    pub menu: Vec<MenuLinkView>,
    pub title: &'static str,
    pub is_users: bool,
    pub is_blog: bool,
    pub blog_panel_url: String,
    pub roster: Vec<RosterRowView>,
    pub email_draft: String,
    pub busy: bool,
}

/// Promotion form data.
#[derive(Debug, Deserialize)]
pub struct PromoteForm {
    #[serde(default)]
    pub email: String,
}

/// Build the panel router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(index))
        .route("/admin/users", get(index).post(promote_admin))
        .route("/admin/{section}", get(show_section))
}

/// GET /admin, GET /admin/users
#[instrument(skip_all)]
async fn index(
    State(state): State<AppState>,
    guard: AdminGuard,
) -> Result<Html<String>, AppError> {
    show(&state, guard, Section::default()).await
}

/// GET /admin/{section}
#[instrument(skip(state, guard))]
async fn show_section(
    State(state): State<AppState>,
    guard: AdminGuard,
    Path(section): Path<String>,
) -> Result<Html<String>, AppError> {
    let section = section
        .parse::<Section>()
        .map_err(|e| AppError::NotFound(e.to_string()))?;
    show(&state, guard, section).await
}

/// POST /admin/users
///
/// Renders the users section directly with the outcome, so the roster shown
/// is the one fetched after the grant.
#[instrument(skip_all)]
async fn promote_admin(
    State(state): State<AppState>,
    AdminGuard { session, mut user }: AdminGuard,
    Form(form): Form<PromoteForm>,
) -> Result<Html<String>, AppError> {
    let mut panel_state = PanelState::load(&session).await?;
    let result = panel::promote(&state, &session, &mut user, &mut panel_state, &form.email).await;
    panel_state.save(&session).await?;
    result?;

    render(&state, &session, &user, Section::Users, &panel_state).await
}

async fn show(
    state: &AppState,
    AdminGuard { session, mut user }: AdminGuard,
    section: Section,
) -> Result<Html<String>, AppError> {
    let mut panel_state = PanelState::load(&session).await?;

    // Only the users section needs the roster
    if section.panel() == PanelKind::Users {
        let result = panel::load_roster(state, &session, &mut user, &mut panel_state).await;
        panel_state.save(&session).await?;
        result?;
    }

    render(state, &session, &user, section, &panel_state).await
}

async fn render(
    state: &AppState,
    session: &Session,
    user: &SignedInUser,
    section: Section,
    panel_state: &PanelState,
) -> Result<Html<String>, AppError> {
    let template = PanelTemplate {
        user_email: user.email.clone(),
        notices: notices::take(session).await,
        menu: MENU
            .iter()
            .map(|item| MenuLinkView::new(item, section))
            .collect(),
        title: section.title(),
        is_users: section.panel() == PanelKind::Users,
        is_blog: section.panel() == PanelKind::Blog,
        blog_panel_url: state.config().blog_panel_url.clone(),
        roster: panel_state.roster.iter().map(RosterRowView::from).collect(),
        email_draft: panel_state.email_draft.clone(),
        busy: state.busy().contains(&user.uid),
    };

    Ok(Html(template.render()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_link_marks_active_section() {
        let links: Vec<MenuLinkView> = MENU
            .iter()
            .map(|item| MenuLinkView::new(item, Section::Blog))
            .collect();

        let active: Vec<&str> = links
            .iter()
            .filter(|link| link.is_active)
            .map(|link| link.href.as_str())
            .collect();
        assert_eq!(active, ["/admin/blog"]);
        assert_eq!(links[0].href, "/admin/dashboard");
    }
}
