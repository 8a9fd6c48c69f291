//! Roles backend HTTP client.

use minik_core::{AdminEntry, Email, Roster};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::error::{ErrorCode, GRANT_FAILED, LIST_FAILED, RolesError};
use crate::config::FunctionsConfig;

/// Endpoint returning every account with the admin role.
pub const LIST_ADMINS: &str = "listAdmins";

/// Endpoint granting the admin role to an email.
pub const SET_ADMIN_ROLE: &str = "setAdminRole";

/// Body of a failed call.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// Body of a successful `setAdminRole` call.
#[derive(Debug, Default, Deserialize)]
struct GrantBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Serialize)]
struct GrantRequest<'a> {
    email: &'a str,
}

/// Client for `listAdmins` and `setAdminRole`.
#[derive(Debug, Clone)]
pub struct RolesClient {
    client: Client,
    base_url: String,
}

impl RolesClient {
    /// Create a client for the backend at `config.base_url`.
    #[must_use]
    pub fn new(config: &FunctionsConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{name}", self.base_url)
    }

    /// Fetch the admin roster, deduplicated by email.
    ///
    /// # Errors
    ///
    /// Returns `RolesError::Api` with the backend's message on a non-success
    /// status, `RolesError::Http` if the request could not be sent, and
    /// `RolesError::Response` if the success body is not a list of entries.
    #[instrument(skip(self, token))]
    pub async fn list_admins(&self, token: &SecretString) -> Result<Roster, RolesError> {
        let response = self
            .client
            .post(self.endpoint(LIST_ADMINS))
            .bearer_auth(token.expose_secret())
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response, LIST_FAILED).await);
        }

        let body = response.text().await?;
        let entries: Vec<AdminEntry> =
            serde_json::from_str(&body).map_err(|e| RolesError::Response(e.to_string()))?;

        let received = entries.len();
        let roster = Roster::from_entries(entries);
        if roster.len() != received {
            debug!(
                received,
                unique = roster.len(),
                "Dropped duplicate roster rows"
            );
        }

        Ok(roster)
    }

    /// Grant the admin role to `email`.
    ///
    /// Returns the backend's success message, if it sent one.
    ///
    /// # Errors
    ///
    /// Returns `RolesError::Api` with the backend's message on a non-success
    /// status and `RolesError::Http` if the request could not be sent.
    #[instrument(skip(self, token), fields(email = %email))]
    pub async fn set_admin_role(
        &self,
        token: &SecretString,
        email: &Email,
    ) -> Result<Option<String>, RolesError> {
        let response = self
            .client
            .post(self.endpoint(SET_ADMIN_ROLE))
            .bearer_auth(token.expose_secret())
            .json(&GrantRequest {
                email: email.as_str(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response, GRANT_FAILED).await);
        }

        // The success body is informational; an unreadable one still means success.
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<GrantBody>(&body)
            .ok()
            .and_then(|body| body.message)
            .filter(|message| !message.trim().is_empty());

        debug!("Admin role granted");

        Ok(message)
    }
}

/// Turn a non-success response into `RolesError::Api`.
async fn api_error(response: Response, default_message: &str) -> RolesError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let parsed: ErrorBody = serde_json::from_str(&body).unwrap_or_default();

    let message = parsed
        .message
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| default_message.to_string());

    warn!(status, code = ?parsed.code, message = %message, "Roles backend returned an error");

    RolesError::Api {
        status,
        code: parsed.code.as_deref().map(ErrorCode::parse),
        message,
    }
}
