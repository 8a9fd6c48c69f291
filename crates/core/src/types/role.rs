//! User roles as reported by the roles backend.

use serde::{Deserialize, Serialize};

/// Role held by a user identity.
///
/// Serialized in lowercase, matching the roles backend wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May use the admin panel and grant roles.
    Admin,
    /// May edit content.
    Editor,
    /// Regular account.
    User,
}

impl Role {
    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Editor => "editor",
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "editor" => Ok(Self::Editor),
            "user" => Ok(Self::User),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}
