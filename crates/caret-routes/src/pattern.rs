//! Compiled test-patterns for route templates
//!
//! Every template compiles to exactly one test-regex with
//! parameter-ordered capture groups (capture group `i + 1` ↔ `params[i]`).
//! Matching is case-insensitive, and a trailing slash on the tested path
//! never breaks a match.

use std::collections::HashMap;

use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::segment::{parse_template, Segment};

/// Error compiling a route template into its test-pattern
#[derive(Debug, Error)]
pub enum PatternError {
    /// The produced regex source failed to compile (e.g. a malformed
    /// inline constraint)
    #[error("invalid test pattern for route `{route}`: {source}")]
    Regex {
        route: String,
        #[source]
        source: regex::Error,
    },
}

/// A route template paired with its compiled test-pattern
///
/// Immutable once compiled; routing tables share these freely across
/// concurrent request handlers.
///
/// # Examples
///
/// ```
/// use caret_routes::CompiledPattern;
///
/// let pattern = CompiledPattern::compile("/shop/:category/[...rest]").unwrap();
/// assert!(pattern.test("/shop/tools/a/b"));
/// assert!(!pattern.test("/shop"));
///
/// let params = pattern.params("/shop/tools/a/b").unwrap();
/// assert_eq!(params.get("category"), Some(&"tools".to_string()));
/// assert_eq!(params.get("rest"), Some(&"a/b".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    route: String,
    source: String,
    params: Vec<String>,
    regex: Regex,
}

impl CompiledPattern {
    /// Compiles a route template into its test-pattern
    pub fn compile(template: &str) -> Result<Self, PatternError> {
        let (source, params) = regex_source(template);
        let regex = build_regex(template, &source)?;
        Ok(Self {
            route: template.to_string(),
            source,
            params,
            regex,
        })
    }

    /// The original route template
    pub fn route(&self) -> &str {
        &self.route
    }

    /// The regex source string, suitable for manifest storage
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Ordered parameter names (capture group `i + 1` ↔ `params()[i]`)
    pub fn param_names(&self) -> &[String] {
        &self.params
    }

    /// Tests a request path against this pattern
    pub fn test(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Extracts named parameters from a matching path
    ///
    /// Returns `None` when the path does not match. Catch-all values are
    /// the matched segments joined with `/`; an optional catch-all that
    /// matched zero segments yields an empty-string value.
    pub fn params(&self, path: &str) -> Option<HashMap<String, String>> {
        let captures = self.regex.captures(path)?;
        let mut params = HashMap::new();
        for (i, name) in self.params.iter().enumerate() {
            let value = captures
                .get(i + 1)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            params.insert(name.clone(), value);
        }
        Some(params)
    }
}

/// Produces the bare test-regex source for a template (pure function)
///
/// This is the string the manifest builder stores; the routing process
/// compiles each stored pattern exactly once at router construction.
///
/// # Examples
///
/// ```
/// use caret_routes::pattern_str;
///
/// assert_eq!(pattern_str("/terms").unwrap(), r"^/terms(?:/)?$");
/// assert_eq!(pattern_str("/users/:id").unwrap(), r"^/users/([^/]+?)(?:/)?$");
/// ```
pub fn pattern_str(template: &str) -> Result<String, PatternError> {
    let (source, _) = regex_source(template);
    // Validate before handing the source out for storage
    build_regex(template, &source)?;
    Ok(source)
}

/// Compiles a stored pattern source back into a case-insensitive regex
///
/// Used by routers to precompile manifest-stored pattern strings once at
/// construction. `route` is only used for error reporting.
pub fn compile_source(route: &str, source: &str) -> Result<Regex, PatternError> {
    build_regex(route, source)
}

fn build_regex(route: &str, source: &str) -> Result<Regex, PatternError> {
    RegexBuilder::new(source)
        .case_insensitive(true)
        .build()
        .map_err(|e| PatternError::Regex {
            route: route.to_string(),
            source: e,
        })
}

/// Maps a template to (regex source, ordered parameter names)
///
/// Regex shape per segment kind:
/// - static → escaped literal
/// - `:x` / `[x]` → `([^/]+?)`
/// - `:x(\d+)` → `(\d+)`
/// - `[...x]` → `((?:[^/]+?)(?:/(?:[^/]+?))*)`
/// - `[[...x]]` → `(?:/((?:[^/]+?)(?:/(?:[^/]+?))*))?` (slash folded into
///   the optional group)
fn regex_source(template: &str) -> (String, Vec<String>) {
    let mut body = String::new();
    let mut params = Vec::new();

    for segment in parse_template(template) {
        match segment {
            Segment::Static(text) => {
                body.push('/');
                body.push_str(&regex::escape(&text));
            }
            Segment::Param { name, constraint } => {
                body.push_str("/(");
                body.push_str(constraint.as_deref().unwrap_or("[^/]+?"));
                body.push(')');
                params.push(name);
            }
            Segment::CatchAll(name) => {
                body.push_str("/((?:[^/]+?)(?:/(?:[^/]+?))*)");
                params.push(name);
            }
            Segment::OptionalCatchAll(name) => {
                body.push_str("(?:/((?:[^/]+?)(?:/(?:[^/]+?))*))?");
                params.push(name);
            }
        }
    }

    if body.is_empty() {
        body.push('/');
    }

    (format!("^{}(?:/)?$", body), params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_pattern() {
        let pattern = CompiledPattern::compile("/terms").unwrap();
        assert!(pattern.test("/terms"));
        assert!(pattern.test("/terms/"));
        assert!(!pattern.test("/terms/x"));
        assert!(!pattern.test("/other"));
    }

    #[test]
    fn test_root_pattern() {
        let pattern = CompiledPattern::compile("/").unwrap();
        assert!(pattern.test("/"));
        assert!(!pattern.test("/a"));
    }

    #[test]
    fn test_case_insensitive() {
        let pattern = CompiledPattern::compile("/Terms").unwrap();
        assert!(pattern.test("/terms"));
        assert!(pattern.test("/TERMS"));
    }

    #[test]
    fn test_param_pattern() {
        let pattern = CompiledPattern::compile("/users/:id").unwrap();
        let params = pattern.params("/users/123").unwrap();
        assert_eq!(params.get("id"), Some(&"123".to_string()));
        assert!(pattern.params("/users").is_none());
        assert!(pattern.params("/users/1/2").is_none());
    }

    #[test]
    fn test_constrained_param() {
        let pattern = CompiledPattern::compile(r"/old-users/:id(\d+)").unwrap();
        assert!(pattern.test("/old-users/42"));
        assert!(!pattern.test("/old-users/abc"));
    }

    #[test]
    fn test_catch_all_requires_one_segment() {
        let pattern = CompiledPattern::compile("/docs/[...slug]").unwrap();
        assert!(!pattern.test("/docs"));
        assert!(pattern.test("/docs/a"));
        let params = pattern.params("/docs/a/b/c").unwrap();
        assert_eq!(params.get("slug"), Some(&"a/b/c".to_string()));
    }

    #[test]
    fn test_optional_catch_all_matches_zero() {
        let pattern = CompiledPattern::compile("/docs/[[...slug]]").unwrap();
        assert!(pattern.test("/docs"));
        assert!(pattern.test("/docs/"));
        let params = pattern.params("/docs").unwrap();
        assert_eq!(params.get("slug"), Some(&String::new()));
        let params = pattern.params("/docs/a/b").unwrap();
        assert_eq!(params.get("slug"), Some(&"a/b".to_string()));
    }

    #[test]
    fn test_param_order_matches_capture_order() {
        let pattern = CompiledPattern::compile("/shop/:category/:item").unwrap();
        assert_eq!(pattern.param_names(), &["category", "item"]);
        let params = pattern.params("/shop/electronics/laptop").unwrap();
        assert_eq!(params.get("category"), Some(&"electronics".to_string()));
        assert_eq!(params.get("item"), Some(&"laptop".to_string()));
    }

    #[test]
    fn test_static_segment_is_escaped() {
        let pattern = CompiledPattern::compile("/a.b").unwrap();
        assert!(pattern.test("/a.b"));
        assert!(!pattern.test("/axb"));
    }

    #[test]
    fn test_invalid_constraint_is_an_error() {
        assert!(CompiledPattern::compile(r"/x/:id([)").is_err());
        assert!(pattern_str(r"/x/:id([)").is_err());
    }

    #[test]
    fn test_compile_source_round_trip() {
        let source = pattern_str("/users/:id").unwrap();
        let regex = compile_source("/users/:id", &source).unwrap();
        assert!(regex.is_match("/users/abc"));
    }
}
