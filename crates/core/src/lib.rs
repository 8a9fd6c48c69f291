//! minik core - Shared types library.
//!
//! This crate provides the types used across all minik admin components:
//! - `admin` - Server-rendered admin panel
//! - `cli` - Command-line access to the roles backend
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Emails, roles, the deduplicated admin roster, and the
//!   panel's side menu

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
