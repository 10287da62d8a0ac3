//! Reverse compilation: parameters → concrete destination path
//!
//! Redirect and rewrite rules carry a destination template that is filled
//! in with the parameters captured from the matched source pattern. Every
//! failure mode here is `None` — a rule whose destination cannot be
//! compiled does not apply and the caller falls through. Nothing in this
//! module panics or returns an error.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::segment::{classify_segment, Segment};

/// Parameter token embedded in literal text: `:name` or `:name*`
static PARAM_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":([A-Za-z0-9_]+)\*?").unwrap());

/// Whether a destination targets an absolute http(s) URL
///
/// External destinations are signaled distinctly from internal paths so
/// callers can choose a different downstream code path (proxy vs.
/// internal re-route).
pub fn is_absolute_url(target: &str) -> bool {
    target.starts_with("http://") || target.starts_with("https://")
}

/// Substitutes captured parameters into a destination template
///
/// - `:name`, `[name]` and `:name*` tokens are replaced with values from
///   `params`; a missing required parameter yields `None`.
/// - An optional catch-all (`[[...name]]`) missing from `params`
///   substitutes empty and the leftover slash is collapsed.
/// - The query part (`?` onward) is never compiled as a path; parameter
///   tokens inside it are substituted textually, so a literal `?` can
///   never collide with pattern syntax.
/// - For absolute http(s) destinations only the path+query component is
///   compiled; scheme and authority pass through verbatim.
/// - If the template did not end in `/` but substitution produced one,
///   the trailing slash is stripped (never stripping the bare root `/`).
///
/// # Examples
///
/// ```
/// use caret_routes::compile_destination;
/// use std::collections::HashMap;
///
/// let mut params = HashMap::new();
/// params.insert("slug".to_string(), "abc".to_string());
///
/// assert_eq!(
///     compile_destination("/news/:slug", &params),
///     Some("/news/abc".to_string())
/// );
/// assert_eq!(compile_destination("/news/:missing", &params), None);
/// assert_eq!(
///     compile_destination("https://example.com/docs/:slug", &params),
///     Some("https://example.com/docs/abc".to_string())
/// );
/// ```
pub fn compile_destination(
    template: &str,
    params: &HashMap<String, String>,
) -> Option<String> {
    let (origin, path_and_query) = split_origin(template);
    if path_and_query.is_empty() {
        // Absolute destination with no path component
        return Some(origin.to_string());
    }

    let (path_template, query_template) = match path_and_query.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (path_and_query, None),
    };

    let mut path = substitute_path(path_template, params)?;

    // Trailing slash follows the template, root exempt
    if !path_template.ends_with('/') && path.ends_with('/') && path != "/" {
        path.pop();
    } else if path_template.ends_with('/') && !path.ends_with('/') {
        path.push('/');
    }

    let mut out = String::from(origin);
    out.push_str(&path);
    if let Some(query) = query_template {
        out.push('?');
        out.push_str(&substitute_text(query, params)?);
    }
    Some(out)
}

/// Builds a concrete path from a route template and parameters
///
/// Round-trip invariant: for every template `T` and valid params,
/// `CompiledPattern::compile(T)?.test(&build_path(T, params)?)` holds.
pub fn build_path(template: &str, params: &HashMap<String, String>) -> Option<String> {
    compile_destination(template, params)
}

/// Splits an absolute destination into (scheme+authority, path+query)
///
/// Internal destinations return an empty origin.
fn split_origin(template: &str) -> (&str, &str) {
    for scheme in ["http://", "https://"] {
        if let Some(rest) = template.strip_prefix(scheme) {
            return match rest.find('/') {
                Some(idx) => template.split_at(scheme.len() + idx),
                None => (template, ""),
            };
        }
    }
    ("", template)
}

/// Substitutes parameters segment by segment
fn substitute_path(path_template: &str, params: &HashMap<String, String>) -> Option<String> {
    let mut out = String::new();

    for segment in path_template.split('/').filter(|s| !s.is_empty()) {
        // Colon spellings first: :name, :name* and :name(constraint)
        if let Some(rest) = segment.strip_prefix(':') {
            let name = rest
                .strip_suffix('*')
                .unwrap_or(rest)
                .split('(')
                .next()
                .unwrap_or(rest);
            let value = params.get(name)?;
            if !value.is_empty() {
                out.push('/');
                out.push_str(value);
            }
            continue;
        }

        match classify_segment(segment) {
            Segment::Param { name, .. } => {
                let value = params.get(&name)?;
                out.push('/');
                out.push_str(value);
            }
            Segment::CatchAll(name) => {
                let value = params.get(&name)?;
                if !value.is_empty() {
                    out.push('/');
                    out.push_str(value);
                }
            }
            Segment::OptionalCatchAll(name) => {
                // Missing or empty substitutes nothing; the slash collapses
                if let Some(value) = params.get(&name) {
                    if !value.is_empty() {
                        out.push('/');
                        out.push_str(value);
                    }
                }
            }
            Segment::Static(text) => {
                out.push('/');
                out.push_str(&substitute_text(&text, params)?);
            }
        }
    }

    if out.is_empty() {
        out.push('/');
    }
    Some(out)
}

/// Textual substitution of embedded `:name` tokens
///
/// Used for query strings and parameter tokens embedded inside otherwise
/// static text. A token naming a missing parameter yields `None`.
fn substitute_text(text: &str, params: &HashMap<String, String>) -> Option<String> {
    let mut out = String::new();
    let mut last = 0;
    for captures in PARAM_TOKEN.captures_iter(text) {
        let token = captures.get(0).expect("token match");
        out.push_str(&text[last..token.start()]);
        out.push_str(params.get(&captures[1])?);
        last = token.end();
    }
    out.push_str(&text[last..]);
    Some(out)
}
