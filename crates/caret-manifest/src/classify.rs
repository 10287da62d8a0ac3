//! Page classification
//!
//! The raw route→file map is classified along two independent axes before
//! any bucket is touched: what kind of artifact the file is, and what
//! shape the route template has. Keeping the 3×3 matrix as an explicit
//! enumerated function makes the dispatch auditable and testable on its
//! own, instead of burying it in nested conditionals.

use caret_routes::is_dynamic_route;

/// Artifact kind, decided by a disjoint test in fixed priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// Fully static HTML artifact (`.html` suffix)
    Html,
    /// API handler (artifact under the `pages/api` prefix)
    Api,
    /// Server-rendered page (everything else)
    Ssr,
}

/// Route template shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteShape {
    /// No parameterized segments; resolved by exact lookup
    Static,
    /// Has a required dynamic segment
    Dynamic,
    /// Ends in `[[...name]]`; registers BOTH the dynamic entry and a
    /// companion non-dynamic base entry
    OptionalCatchAll,
}

/// Combined classification of one raw route→file entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageClass {
    pub kind: PageKind,
    pub shape: RouteShape,
}

/// Classifies a raw route→file entry (pure function)
///
/// Kind is tested in fixed priority order: static HTML artifact first,
/// then API prefix, then server-rendered. Shape is independent of kind.
///
/// # Examples
///
/// ```
/// use caret_manifest::{classify_page, PageKind, RouteShape};
///
/// let class = classify_page("/terms", "pages/terms.html");
/// assert_eq!(class.kind, PageKind::Html);
/// assert_eq!(class.shape, RouteShape::Static);
///
/// let class = classify_page("/api/users/[id]", "pages/api/users/[id].js");
/// assert_eq!(class.kind, PageKind::Api);
/// assert_eq!(class.shape, RouteShape::Dynamic);
///
/// let class = classify_page("/docs/[[...slug]]", "pages/docs/[[...slug]].js");
/// assert_eq!(class.kind, PageKind::Ssr);
/// assert_eq!(class.shape, RouteShape::OptionalCatchAll);
/// ```
pub fn classify_page(route: &str, file: &str) -> PageClass {
    let kind = if file.ends_with(".html") {
        PageKind::Html
    } else if file.starts_with("pages/api") {
        PageKind::Api
    } else {
        PageKind::Ssr
    };

    let shape = if route.contains("[[...") {
        RouteShape::OptionalCatchAll
    } else if is_dynamic_route(route) {
        RouteShape::Dynamic
    } else {
        RouteShape::Static
    };

    PageClass { kind, shape }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_artifact_wins_over_api_prefix() {
        // Suffix test runs first in the priority order
        let class = classify_page("/api/docs", "pages/api/docs.html");
        assert_eq!(class.kind, PageKind::Html);
    }

    #[test]
    fn test_api_prefix() {
        let class = classify_page("/api/health", "pages/api/health.js");
        assert_eq!(class.kind, PageKind::Api);
        assert_eq!(class.shape, RouteShape::Static);
    }

    #[test]
    fn test_ssr_is_the_default_kind() {
        let class = classify_page("/dashboard", "pages/dashboard.js");
        assert_eq!(class.kind, PageKind::Ssr);
    }

    #[test]
    fn test_shapes() {
        assert_eq!(
            classify_page("/terms", "pages/terms.html").shape,
            RouteShape::Static
        );
        assert_eq!(
            classify_page("/users/[id]", "pages/users/[id].html").shape,
            RouteShape::Dynamic
        );
        assert_eq!(
            classify_page("/docs/[...slug]", "pages/docs/[...slug].js").shape,
            RouteShape::Dynamic
        );
        assert_eq!(
            classify_page("/docs/[[...slug]]", "pages/docs/[[...slug]].js").shape,
            RouteShape::OptionalCatchAll
        );
    }
}
