//! Admin role commands.
//!
//! # Usage
//!
//! ```bash
//! # List every account holding the admin role
//! minik-cli admins list
//!
//! # Grant the admin role to an account
//! minik-cli admins promote user@example.com
//! ```
//!
//! # Environment Variables
//!
//! - `MINIK_CLI_EMAIL` - Email of the admin account to act as
//! - `MINIK_CLI_PASSWORD` - Password of that account
//! - `MINIK_FUNCTIONS_URL` - Base URL of the roles backend
//! - `MINIK_IDENTITY_API_KEY` - Identity provider web API key
//! - `MINIK_IDENTITY_URL`, `MINIK_SECURE_TOKEN_URL` - Optional provider overrides

use minik_admin::config::{ConfigError, FunctionsConfig, IdentityConfig};
use minik_admin::identity::{IdentityClient, IdentityError};
use minik_admin::roles::{RolesClient, RolesError};
use minik_core::{Email, EmailError, Roster};
use secrecy::SecretString;
use thiserror::Error;

/// Errors that can occur during admin role operations.
#[derive(Debug, Error)]
pub enum AdminsError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Sign-in failed.
    #[error("Sign-in failed: {}", .0.user_message())]
    Identity(#[from] IdentityError),

    /// The roles backend refused or failed.
    #[error("{}", .0.user_message())]
    Roles(#[from] RolesError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
}

/// A signed-in roles backend session.
struct Caller {
    roles: RolesClient,
    token: SecretString,
}

async fn sign_in() -> Result<Caller, AdminsError> {
    dotenvy::dotenv().ok();

    let identity = IdentityConfig::from_env()?;
    let functions = FunctionsConfig::from_env()?;
    let email = std::env::var("MINIK_CLI_EMAIL")
        .map_err(|_| AdminsError::MissingEnvVar("MINIK_CLI_EMAIL"))?;
    let password = std::env::var("MINIK_CLI_PASSWORD")
        .map(SecretString::from)
        .map_err(|_| AdminsError::MissingEnvVar("MINIK_CLI_PASSWORD"))?;

    tracing::info!("Signing in as {}...", email);
    let user = IdentityClient::new(&identity)
        .sign_in_with_password(&email, &password)
        .await?;

    if !user.is_admin {
        tracing::warn!("{} has no admin claim; the roles backend may refuse", email);
    }

    Ok(Caller {
        roles: RolesClient::new(&functions),
        token: user.id_token(),
    })
}

fn log_roster(roster: &Roster) {
    tracing::info!("{} admin(s):", roster.len());
    for entry in roster {
        tracing::info!("  {} ({})", entry.email, entry.role);
    }
}

/// List every account holding the admin role.
///
/// # Errors
///
/// Returns `AdminsError` if sign-in or the `listAdmins` call fails.
pub async fn list() -> Result<Roster, AdminsError> {
    let caller = sign_in().await?;
    let roster = caller.roles.list_admins(&caller.token).await?;
    log_roster(&roster);
    Ok(roster)
}

/// Grant the admin role to `email`, then show the updated roster.
///
/// # Errors
///
/// Returns `AdminsError::InvalidEmail` before any network call if the address
/// is malformed, or the sign-in / backend error otherwise.
pub async fn promote(email: &str) -> Result<(), AdminsError> {
    let email = Email::parse(email.trim())?;
    let caller = sign_in().await?;

    let message = caller.roles.set_admin_role(&caller.token, &email).await?;
    tracing::info!(
        "{}",
        message.unwrap_or_else(|| format!("{email} was granted the admin role"))
    );

    let roster = caller.roles.list_admins(&caller.token).await?;
    log_roster(&roster);
    Ok(())
}
