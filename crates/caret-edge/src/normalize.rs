//! Request-path normalization helpers for the routers

use caret_manifest::I18n;
use caret_manifest::locale::{has_locale_prefix, with_locale};

/// Split a request URI into path and querystring
///
/// Pure function: the query delimiter is the first `?`; the path part
/// never contains one.
///
/// # Examples
///
/// ```
/// use caret_edge::split_query;
///
/// assert_eq!(split_query("/a/b?x=1&y=2"), ("/a/b", Some("x=1&y=2")));
/// assert_eq!(split_query("/a/b"), ("/a/b", None));
/// ```
pub fn split_query(uri: &str) -> (&str, Option<&str>) {
    match uri.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (uri, None),
    }
}

/// Prepend the default locale to a path that names no configured locale
///
/// Manifest page keys for a localized build always carry a locale
/// segment; an un-prefixed request path is treated as the default
/// locale. Without i18n the path passes through unchanged.
pub fn insert_default_locale(path: &str, i18n: Option<&I18n>) -> String {
    match i18n {
        Some(i18n) if !has_locale_prefix(path, &i18n.locales) => {
            with_locale(path, &i18n.default_locale)
        }
        _ => path.to_string(),
    }
}
