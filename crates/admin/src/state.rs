//! Application state shared across handlers.

use std::sync::Arc;

use dashmap::DashSet;

use crate::config::AdminConfig;
use crate::identity::IdentityClient;
use crate::roles::RolesClient;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    identity: IdentityClient,
    roles: RolesClient,
    /// Users with a promotion request in flight, by uid.
    busy: DashSet<String>,
}

impl AppState {
    /// Build the state and its HTTP clients from configuration.
    #[must_use]
    pub fn new(config: AdminConfig) -> Self {
        let identity = IdentityClient::new(&config.identity);
        let roles = RolesClient::new(&config.functions);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                identity,
                roles,
                busy: DashSet::new(),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn identity(&self) -> &IdentityClient {
        &self.inner.identity
    }

    #[must_use]
    pub fn roles(&self) -> &RolesClient {
        &self.inner.roles
    }

    #[must_use]
    pub fn busy(&self) -> &DashSet<String> {
        &self.inner.busy
    }
}
