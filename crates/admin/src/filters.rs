//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Capitalizes a wire role name for display (`admin` becomes `Admin`).
///
/// Usage in templates: `{{ entry.role|role_label }}`
#[askama::filter_fn]
pub fn role_label(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(capitalize(&value.to_string()))
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("admin"), "Admin");
        assert_eq!(capitalize("editor"), "Editor");
        assert_eq!(capitalize(""), "");
    }
}
