//! Core types for the minik admin panel.
//!
//! This module provides type-safe wrappers for the panel's domain concepts.

pub mod email;
pub mod role;
pub mod roster;
pub mod section;

pub use email::{Email, EmailError};
pub use role::Role;
pub use roster::{AdminEntry, Roster};
pub use section::{MENU, MenuItem, PanelKind, Section, UnknownSection};
