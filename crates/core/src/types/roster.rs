//! The admin roster: users currently holding the admin role.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{Email, Role};

/// One row of the `listAdmins` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminEntry {
    /// Account email.
    pub email: Email,
    /// Role held by the account.
    pub role: Role,
}

/// Ordered list of [`AdminEntry`] with unique emails.
///
/// Every construction path deduplicates by exact email, keeping the first
/// occurrence, so a roster never holds two rows for the same address. This
/// includes deserialization, which goes through [`Roster::from_entries`].
///
/// ```
/// use minik_core::{AdminEntry, Email, Role, Roster};
///
/// let a = AdminEntry { email: Email::parse("a@x.com").unwrap(), role: Role::Admin };
/// let roster = Roster::from_entries(vec![a.clone(), a]);
/// assert_eq!(roster.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<AdminEntry>", into = "Vec<AdminEntry>")]
pub struct Roster(Vec<AdminEntry>);

impl Roster {
    /// Build a roster, dropping later rows whose email was already seen.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = AdminEntry>) -> Self {
        let mut seen = HashSet::new();
        let unique = entries
            .into_iter()
            .filter(|entry| seen.insert(entry.email.clone()))
            .collect();
        Self(unique)
    }

    /// Rows in backend order.
    #[must_use]
    pub fn entries(&self) -> &[AdminEntry] {
        &self.0
    }

    /// Number of distinct admins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the roster holds a row for `email`.
    #[must_use]
    pub fn contains(&self, email: &Email) -> bool {
        self.0.iter().any(|entry| &entry.email == email)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AdminEntry> {
        self.0.iter()
    }
}

impl From<Vec<AdminEntry>> for Roster {
    fn from(entries: Vec<AdminEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<Roster> for Vec<AdminEntry> {
    fn from(roster: Roster) -> Self {
        roster.0
    }
}

impl FromIterator<AdminEntry> for Roster {
    fn from_iter<I: IntoIterator<Item = AdminEntry>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a AdminEntry;
    type IntoIter = std::slice::Iter<'a, AdminEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn entry(email: &str, role: Role) -> AdminEntry {
        AdminEntry {
            email: Email::parse(email).unwrap(),
            role,
        }
    }

    #[test]
    fn test_duplicate_rows_collapse_to_one() {
        let roster = Roster::from_entries(vec![
            entry("a@x.com", Role::Admin),
            entry("a@x.com", Role::Admin),
        ]);
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.entries()[0].email.as_str(), "a@x.com");
    }

    #[test]
    fn test_first_occurrence_wins_and_order_is_kept() {
        let roster = Roster::from_entries(vec![
            entry("c@x.com", Role::Admin),
            entry("a@x.com", Role::Editor),
            entry("c@x.com", Role::User),
            entry("b@x.com", Role::Admin),
        ]);
        let emails: Vec<&str> = roster.iter().map(|e| e.email.as_str()).collect();
        assert_eq!(emails, ["c@x.com", "a@x.com", "b@x.com"]);
        assert_eq!(roster.entries()[0].role, Role::Admin);
    }

    #[test]
    fn test_emails_compare_exactly() {
        let roster = Roster::from_entries(vec![
            entry("a@x.com", Role::Admin),
            entry("A@x.com", Role::Admin),
        ]);
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn test_deserialize_deduplicates() {
        let json = r#"[{"email":"a@x.com","role":"admin"},{"email":"a@x.com","role":"admin"},{"email":"b@x.com","role":"editor"}]"#;
        let roster: Roster = serde_json::from_str(json).unwrap();
        assert_eq!(roster.len(), 2);
        assert!(roster.contains(&Email::parse("b@x.com").unwrap()));
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let json = r#"[{"email":"a@x.com","role":"owner"}]"#;
        assert!(serde_json::from_str::<Roster>(json).is_err());
    }

    #[test]
    fn test_default_is_empty() {
        assert!(Roster::default().is_empty());
    }
}
