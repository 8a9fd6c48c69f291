//! Flash notices.
//!
//! Notices are queued in the session by one request and drained by the next
//! page that renders, so a redirect can carry its explanation with it.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::models::session_keys;

/// Notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

impl NoticeLevel {
    /// CSS class suffix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A one-shot message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Queue a notice for the next rendered page.
///
/// # Errors
///
/// Returns the session store error if the queue cannot be read or written.
pub async fn push(session: &Session, notice: Notice) -> Result<(), tower_sessions::session::Error> {
    let mut queue: Vec<Notice> = session
        .get(session_keys::NOTICES)
        .await?
        .unwrap_or_default();
    queue.push(notice);
    session.insert(session_keys::NOTICES, queue).await
}

/// Drain every queued notice.
///
/// A store failure yields no notices; rendering must not fail over flash
/// messages.
pub async fn take(session: &Session) -> Vec<Notice> {
    match session.remove::<Vec<Notice>>(session_keys::NOTICES).await {
        Ok(queue) => queue.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read notices from session");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::session;

    #[tokio::test]
    async fn test_notices_drain_in_order() {
        let session = session();
        push(&session, Notice::error("first")).await.unwrap();
        push(&session, Notice::success("second")).await.unwrap();

        let drained = take(&session).await;
        assert_eq!(drained, vec![Notice::error("first"), Notice::success("second")]);

        assert!(take(&session).await.is_empty());
    }

    #[test]
    fn test_level_serializes_lowercase() {
        let json = serde_json::to_string(&Notice::success("ok")).unwrap();
        assert_eq!(json, r#"{"level":"success","text":"ok"}"#);
    }
}
