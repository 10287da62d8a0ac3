//! Path utilities for validation and normalization
//!
//! All functions are **pure**: given the same input, always produce the
//! same output with no side effects.

use std::borrow::Cow;

use crate::segment::parse_template;

/// Validates if a path is in canonical form
///
/// # Rules
///
/// - Must start with `/`
/// - Must not contain `//` or `\`
/// - Must not end with `/` (except root `/`)
/// - Must not be empty
///
/// # Examples
///
/// ```
/// use caret_routes::is_valid_path;
///
/// assert!(is_valid_path("/"));
/// assert!(is_valid_path("/terms"));
///
/// assert!(!is_valid_path(""));
/// assert!(!is_valid_path("terms")); // Missing leading /
/// assert!(!is_valid_path("/terms/")); // Trailing /
/// assert!(!is_valid_path("/a//b")); // Double //
/// ```
pub fn is_valid_path(path: &str) -> bool {
    if path.is_empty() {
        return false;
    }
    if !path.starts_with('/') {
        return false;
    }
    if path.contains("//") || path.contains('\\') {
        return false;
    }
    if path == "/" {
        return true;
    }
    !path.ends_with('/')
}

/// Normalize a path to canonical form
///
/// **Pure function** with zero-copy optimization using `Cow<'_, str>`:
/// returns `Cow::Borrowed` when the input is already valid and allocates
/// only when normalization is needed.
///
/// # Examples
///
/// ```
/// use caret_routes::normalize_path;
/// use std::borrow::Cow;
///
/// let path = normalize_path("/terms");
/// assert!(matches!(path, Cow::Borrowed("/terms")));
///
/// assert_eq!(normalize_path("/terms/"), "/terms");
/// assert_eq!(normalize_path("/a//b"), "/a/b");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if is_valid_path(path) {
        return Cow::Borrowed(path);
    }

    let normalized = path
        .replace('\\', "/")
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if normalized.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{}", normalized))
    }
}

/// Whether a template contains any dynamic segment
///
/// Non-dynamic routes are resolved by exact mapping lookup; dynamic
/// routes go through pattern testing.
///
/// # Examples
///
/// ```
/// use caret_routes::is_dynamic_route;
///
/// assert!(is_dynamic_route("/users/:id"));
/// assert!(is_dynamic_route("/users/[id]"));
/// assert!(is_dynamic_route("/docs/[...slug]"));
/// assert!(!is_dynamic_route("/terms"));
/// ```
pub fn is_dynamic_route(template: &str) -> bool {
    parse_template(template).iter().any(|s| s.is_dynamic())
}

/// Whether a template contains a catch-all or optional catch-all marker
///
/// Catch-all routes are tried strictly after all more-specific dynamic
/// routes, so manifests partition them into their own bucket.
pub fn has_catch_all(template: &str) -> bool {
    template.contains("[...") || template.contains("[[...")
}
