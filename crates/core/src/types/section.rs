//! Admin panel sections and the side menu.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A content panel selectable from the side menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Dashboard,
    /// Admin roster and promotion form.
    #[default]
    Users,
    /// Delegated to the blog management panel.
    Blog,
    Calculator,
    Documents,
    Crm,
    Billing,
    Feedback,
    Ai,
    Settings,
}

/// What a section renders in the content area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    /// Roster and promotion form.
    Users,
    /// External blog management container.
    Blog,
    /// Generic "coming soon" placeholder.
    Placeholder,
}

/// A side menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub section: Section,
    pub title: &'static str,
    /// Icon name, rendered as a CSS class.
    pub icon: &'static str,
}

impl MenuItem {
    /// Path segment and stable identifier.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        self.section.id()
    }
}

/// The side menu, in display order.
pub const MENU: [MenuItem; 10] = [
    MenuItem {
        section: Section::Dashboard,
        title: "Dashboard",
        icon: "bar-chart",
    },
    MenuItem {
        section: Section::Users,
        title: "User Management",
        icon: "users",
    },
    MenuItem {
        section: Section::Blog,
        title: "Blog Management",
        icon: "file-text",
    },
    MenuItem {
        section: Section::Calculator,
        title: "Calculation Tools",
        icon: "calculator",
    },
    MenuItem {
        section: Section::Documents,
        title: "File Management",
        icon: "file-box",
    },
    MenuItem {
        section: Section::Crm,
        title: "Questions & Answers",
        icon: "message-square",
    },
    MenuItem {
        section: Section::Billing,
        title: "Billing & Subscriptions",
        icon: "credit-card",
    },
    MenuItem {
        section: Section::Feedback,
        title: "Feedback",
        icon: "pie-chart",
    },
    MenuItem {
        section: Section::Ai,
        title: "AI Recommendations",
        icon: "brain",
    },
    MenuItem {
        section: Section::Settings,
        title: "Settings",
        icon: "settings",
    },
];

impl Section {
    /// Path segment and stable identifier.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Users => "users",
            Self::Blog => "blog",
            Self::Calculator => "calculator",
            Self::Documents => "documents",
            Self::Crm => "crm",
            Self::Billing => "billing",
            Self::Feedback => "feedback",
            Self::Ai => "ai",
            Self::Settings => "settings",
        }
    }

    /// The menu entry for this section.
    #[must_use]
    pub fn menu_item(self) -> &'static MenuItem {
        // MENU lists every variant
        MENU.iter()
            .find(|item| item.section == self)
            .unwrap_or(&MENU[1])
    }

    /// Menu title.
    #[must_use]
    pub fn title(self) -> &'static str {
        self.menu_item().title
    }

    #[must_use]
    pub const fn panel(self) -> PanelKind {
        match self {
            Self::Users => PanelKind::Users,
            Self::Blog => PanelKind::Blog,
            _ => PanelKind::Placeholder,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error for an id that names no section.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown section: {0}")]
pub struct UnknownSection(pub String);

impl std::str::FromStr for Section {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MENU.iter()
            .find(|item| item.id() == s)
            .map(|item| item.section)
            .ok_or_else(|| UnknownSection(s.to_owned()))
    }
}
