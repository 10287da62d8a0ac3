//! Locale materialization
//!
//! When internationalization is configured, every non-locale-prefixed
//! route gains locale-prefixed duplicates at build time so no locale
//! computation happens at request time. Materialization is additive:
//! locale duplicates augment, never replace, the base entries, and the
//! unprefixed originals always remain.
//!
//! Everything here is a pure function producing new merged structures;
//! the base structures are never mutated in place.

use anyhow::{Context, Result};

use caret_routes::pattern_str;

use crate::builder::{data_route_pattern, PageBuckets};
use crate::manifest::{DynamicStaticGenRoute, I18n, PageFile, StaticGenRoute};

/// The configured locale a path is prefixed with, if any
///
/// # Examples
///
/// ```
/// use caret_manifest::locale::locale_of;
///
/// let locales = vec!["en".to_string(), "fr".to_string()];
/// assert_eq!(locale_of("/fr/terms", &locales), Some("fr"));
/// assert_eq!(locale_of("/FR/terms", &locales), Some("FR"));
/// assert_eq!(locale_of("/terms", &locales), None);
/// assert_eq!(locale_of("/", &locales), None);
/// ```
pub fn locale_of<'a>(path: &'a str, locales: &[String]) -> Option<&'a str> {
    let first = path.trim_start_matches('/').split('/').next()?;
    if first.is_empty() {
        return None;
    }
    locales
        .iter()
        .any(|locale| locale.eq_ignore_ascii_case(first))
        .then_some(first)
}

/// Whether a path is already prefixed with ANY configured locale
///
/// Used to avoid double-prefixing manifests the build tool already
/// localized.
pub fn has_locale_prefix(path: &str, locales: &[String]) -> bool {
    locale_of(path, locales).is_some()
}

/// Prefixes a path with a locale segment
///
/// # Examples
///
/// ```
/// use caret_manifest::locale::with_locale;
///
/// assert_eq!(with_locale("/terms", "fr"), "/fr/terms");
/// assert_eq!(with_locale("/", "fr"), "/fr");
/// ```
pub fn with_locale(path: &str, locale: &str) -> String {
    if path == "/" {
        format!("/{}", locale)
    } else {
        format!("/{}{}", locale, path)
    }
}

/// Normalizes away a default-locale prefix the build tool may have emitted
///
/// Upstream builds sometimes emit default-locale-prefixed prerendered
/// paths even when locale prefixing should be implicit. This is a
/// compatibility rule applied only during the SSG merge, not a general
/// principle.
pub fn strip_default_locale(path: &str, i18n: &I18n) -> String {
    let prefix = format!("/{}", i18n.default_locale);
    if path.eq_ignore_ascii_case(&prefix) {
        return "/".to_string();
    }
    match path.strip_prefix(&prefix) {
        Some(rest) if rest.starts_with('/') => rest.to_string(),
        _ => path.to_string(),
    }
}

/// Normalizes away a default-locale segment in an SSG data route
///
/// Companion to [`strip_default_locale`] for the SSG merge: when the
/// build tool emits a default-locale-prefixed prerendered path, its data
/// route carries the same prefix after the fixed `/_next/data/<buildId>/`
/// part and must be stripped alongside the path key, or later locale
/// materialization would double-prefix it. The root path's data file
/// reverses the naming special case (`<locale>.json` → `index.json`).
pub fn strip_default_locale_data_route(data_route: &str, i18n: &I18n, build_id: &str) -> String {
    let prefix = format!("/_next/data/{}/", build_id);
    let Some(rest) = data_route.strip_prefix(&prefix) else {
        return data_route.to_string();
    };

    let root_file = format!("{}.json", i18n.default_locale);
    if rest.eq_ignore_ascii_case(&root_file) {
        return format!("{}index.json", prefix);
    }

    match rest.strip_prefix(&format!("{}/", i18n.default_locale)) {
        Some(tail) => format!("{}{}", prefix, tail),
        None => data_route.to_string(),
    }
}

/// Inserts a locale into an SSG data route
///
/// The locale segment lands after the fixed data-route prefix, with a
/// special case for the root path's data file naming
/// (`index.json` → `<locale>.json`).
pub fn localize_data_route(data_route: &str, locale: &str, build_id: &str) -> String {
    let prefix = format!("/_next/data/{}/", build_id);
    match data_route.strip_prefix(&prefix) {
        Some("index.json") => format!("{}{}.json", prefix, locale),
        Some(rest) => format!("{}{}/{}", prefix, locale, rest),
        None => data_route.to_string(),
    }
}

/// Inserts a locale path segment into a static HTML artifact path
pub fn localize_html_file(file: &str, locale: &str) -> String {
    match file.strip_prefix("pages/") {
        Some(rest) => format!("pages/{}/{}", locale, rest),
        None => format!("{}/{}", locale, file),
    }
}

/// Materializes locale-prefixed duplicates across all page buckets
///
/// Pure function over immutable inputs: returns new merged buckets and
/// never mutates `buckets`. Entries already prefixed with any configured
/// locale are skipped. SSG route and data-route regexes are regenerated
/// for the localized paths; the base entries keep theirs.
pub(crate) fn materialize_locales(
    buckets: &PageBuckets,
    i18n: &I18n,
    build_id: &str,
) -> Result<PageBuckets> {
    let mut merged = buckets.clone();

    for locale in &i18n.locales {
        for (path, file) in &buckets.html_non_dynamic {
            if has_locale_prefix(path, &i18n.locales) {
                continue;
            }
            merged
                .html_non_dynamic
                .entry(with_locale(path, locale))
                .or_insert_with(|| localize_html_file(file, locale));
        }

        for (route, page) in &buckets.html_dynamic {
            if has_locale_prefix(route, &i18n.locales) {
                continue;
            }
            let localized = with_locale(route, locale);
            let regex = pattern_str(&localized)
                .with_context(|| format!("compiling localized route `{}`", localized))?;
            merged.html_dynamic.entry(localized).or_insert(PageFile {
                file: localize_html_file(&page.file, locale),
                regex,
            });
        }

        for (path, file) in &buckets.ssr_non_dynamic {
            if has_locale_prefix(path, &i18n.locales) {
                continue;
            }
            // Same render function serves every locale variant
            merged
                .ssr_non_dynamic
                .entry(with_locale(path, locale))
                .or_insert_with(|| file.clone());
        }

        for (route, page) in &buckets.ssr_dynamic {
            if has_locale_prefix(route, &i18n.locales) {
                continue;
            }
            let localized = with_locale(route, locale);
            let regex = pattern_str(&localized)
                .with_context(|| format!("compiling localized route `{}`", localized))?;
            merged.ssr_dynamic.entry(localized).or_insert(PageFile {
                file: page.file.clone(),
                regex,
            });
        }

        for (path, route) in &buckets.ssg_non_dynamic {
            if has_locale_prefix(path, &i18n.locales) {
                continue;
            }
            merged
                .ssg_non_dynamic
                .entry(with_locale(path, locale))
                .or_insert_with(|| StaticGenRoute {
                    data_route: localize_data_route(&route.data_route, locale, build_id),
                    revalidate_seconds: route.revalidate_seconds,
                    src_route: route.src_route.clone(),
                });
        }

        for (route, ssg) in &buckets.ssg_dynamic {
            if has_locale_prefix(route, &i18n.locales) {
                continue;
            }
            let localized = with_locale(route, locale);
            let localized_data = localize_data_route(&ssg.data_route, locale, build_id);
            let route_regex = pattern_str(&localized)
                .with_context(|| format!("compiling localized route `{}`", localized))?;
            let data_route_regex = data_route_pattern(&localized_data)
                .with_context(|| format!("compiling localized data route `{}`", localized_data))?;
            merged
                .ssg_dynamic
                .entry(localized)
                .or_insert(DynamicStaticGenRoute {
                    route_regex,
                    data_route: localized_data,
                    data_route_regex,
                    fallback: ssg.fallback.clone(),
                });
        }
    }

    Ok(merged)
}
