//! Link scheme validation.
//!
//! Links end up as `href` attributes on the build page, so only relative
//! paths, `http(s):` and `mailto:` are allowed unless the host explicitly
//! opts into unsafe links.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Accepts `http:`, `https:` (with or without `//`) and `mailto:`.
const SAFE_SCHEME_PATTERN: &str = r"^(?:https?:|mailto:)";

static SAFE_SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SAFE_SCHEME_PATTERN).expect("valid regex"));

/// Whether `link` passes the scheme allow-list.
pub fn is_safe_link(link: &str) -> bool {
    link.trim().is_empty() || link.starts_with('/') || SAFE_SCHEME_RE.is_match(link)
}

/// Lenient validation: unsafe links become `None`.
pub fn validate_link(link: Option<&str>, allow_unsafe: bool) -> Option<String> {
    let link = link?;
    if allow_unsafe || is_safe_link(link) {
        return Some(link.to_string());
    }
    tracing::warn!(link = %link, "Dropping link with disallowed scheme");
    None
}

/// Strict validation: unsafe links are an error.
pub fn validate_link_strict(
    link: Option<&str>,
    allow_unsafe: bool,
) -> Result<Option<String>, CoreError> {
    let Some(link) = link else {
        return Ok(None);
    };
    if allow_unsafe || is_safe_link(link) {
        return Ok(Some(link.to_string()));
    }
    Err(CoreError::InvalidArgument(format!("Invalid link: {link}")))
}
