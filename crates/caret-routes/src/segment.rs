//! Segment classification for route templates
//!
//! Pure functional parsing of route template segments into typed values.
//! All functions are **pure**: same input → same output, no side effects.

/// Typed form of a single route template segment
///
/// Functional sum type for pattern matching template segments. Both marker
/// spellings are accepted on input: `:id` and `[id]` classify identically.
///
/// # Examples
///
/// ```
/// use caret_routes::{classify_segment, Segment};
///
/// // Static segment
/// let seg = classify_segment("terms");
/// assert!(matches!(seg, Segment::Static(_)));
///
/// // Named parameter (both spellings)
/// let seg = classify_segment(":id");
/// assert!(matches!(seg, Segment::Param { .. }));
/// let seg = classify_segment("[id]");
/// assert!(matches!(seg, Segment::Param { .. }));
///
/// // Constrained parameter
/// let seg = classify_segment(r":id(\d+)");
/// assert!(matches!(seg, Segment::Param { constraint: Some(_), .. }));
///
/// // Catch-all and optional catch-all
/// let seg = classify_segment("[...slug]");
/// assert!(matches!(seg, Segment::CatchAll(_)));
/// let seg = classify_segment("[[...slug]]");
/// assert!(matches!(seg, Segment::OptionalCatchAll(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Static text segment
    Static(String),
    /// Named parameter: `:id`, `[id]`, optionally constrained `:id(\d+)`
    Param {
        name: String,
        /// Inline regex constraint, used verbatim as the capture group body
        constraint: Option<String>,
    },
    /// Catch-all segment: `[...slug]` (one or more segments)
    CatchAll(String),
    /// Optional catch-all segment: `[[...slug]]` (zero or more segments)
    OptionalCatchAll(String),
}

impl Segment {
    /// Whether this segment consumes a request parameter
    pub fn is_dynamic(&self) -> bool {
        !matches!(self, Segment::Static(_))
    }

    /// Parameter name for dynamic segments
    pub fn param_name(&self) -> Option<&str> {
        match self {
            Segment::Static(_) => None,
            Segment::Param { name, .. } => Some(name),
            Segment::CatchAll(name) => Some(name),
            Segment::OptionalCatchAll(name) => Some(name),
        }
    }
}

/// Classifies a template segment into its typed form (pure function)
///
/// # Parsing Rules (evaluated in order)
///
/// 1. **Optional catch-all**: `[[...name]]`
/// 2. **Catch-all**: `[...name]`
/// 3. **Bracket parameter**: `[name]`
/// 4. **Colon parameter**: `:name` or `:name(constraint)`
/// 5. **Static**: any other text
pub fn classify_segment(segment: &str) -> Segment {
    // Optional catch-all: [[...name]] (double brackets)
    if segment.starts_with("[[") && segment.ends_with("]]") {
        let inner = &segment[2..segment.len() - 2];
        if let Some(name) = inner.strip_prefix("...") {
            return Segment::OptionalCatchAll(name.to_string());
        }
    }

    if let Some(inner) = segment.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        // Catch-all: [...name]
        if let Some(name) = inner.strip_prefix("...") {
            return Segment::CatchAll(name.to_string());
        }
        // Required parameter: [name]
        return Segment::Param {
            name: inner.to_string(),
            constraint: None,
        };
    }

    // Colon parameter: :name or :name(constraint)
    if let Some(inner) = segment.strip_prefix(':') {
        let (name, constraint) = parse_param_with_constraint(inner);
        return Segment::Param { name, constraint };
    }

    Segment::Static(segment.to_string())
}

/// Parses a parameter name and optional inline constraint (pure function)
///
/// Maps `"id"` → `("id", None)` and `r"id(\d+)"` → `("id", Some(r"\d+"))`.
/// The parenthesized constraint becomes the capture group body verbatim.
fn parse_param_with_constraint(param: &str) -> (String, Option<String>) {
    match param.split_once('(') {
        Some((name, rest)) if rest.ends_with(')') => (
            name.to_string(),
            Some(rest[..rest.len() - 1].to_string()),
        ),
        _ => (param.to_string(), None),
    }
}

/// Parses a route template into typed segments (pure function)
///
/// Empty segments (leading slash, double slashes) are skipped, so the root
/// template `/` parses to an empty segment list.
///
/// # Examples
///
/// ```
/// use caret_routes::{parse_template, Segment};
///
/// let segments = parse_template("/users/:id");
/// assert_eq!(segments.len(), 2);
/// assert_eq!(segments[0], Segment::Static("users".to_string()));
/// assert_eq!(segments[1].param_name(), Some("id"));
///
/// assert!(parse_template("/").is_empty());
/// ```
pub fn parse_template(template: &str) -> Vec<Segment> {
    template
        .split('/')
        .filter(|s| !s.is_empty())
        .map(classify_segment)
        .collect()
}

/// Computes the companion base path of an optional catch-all template
///
/// An optional catch-all matches zero segments, so the template also covers
/// the path with the catch-all segment stripped. That base path is
/// registered as a separate non-dynamic entry by the manifest builder.
///
/// # Examples
///
/// ```
/// use caret_routes::optional_catch_all_base;
///
/// assert_eq!(
///     optional_catch_all_base("/docs/[[...slug]]"),
///     Some("/docs".to_string())
/// );
/// assert_eq!(optional_catch_all_base("/[[...slug]]"), Some("/".to_string()));
/// assert_eq!(optional_catch_all_base("/docs/[...slug]"), None);
/// ```
pub fn optional_catch_all_base(template: &str) -> Option<String> {
    let idx = template.find("/[[...")?;
    let base = &template[..idx];
    Some(if base.is_empty() {
        "/".to_string()
    } else {
        base.to_string()
    })
}
