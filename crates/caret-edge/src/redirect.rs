//! Redirect primitives shared by the page, API and asset flows
//!
//! Rule-table redirect scanning lives on the routers (it needs the
//! precompiled tables); this module holds the redirect value type and
//! the rule-independent redirect sources: domain redirects,
//! trailing-slash normalization and the root-path language redirect.

use std::collections::BTreeMap;

use caret_manifest::{Header, I18n};
use caret_routes::is_absolute_url;

use crate::language::preferred_locale;
use crate::request::EdgeRequest;

/// A resolved redirect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub path: String,
    pub status_code: u16,
}

impl Redirect {
    /// Whether the destination is an absolute http(s) URL
    ///
    /// External targets take a different downstream code path than
    /// internal re-routes.
    pub fn is_external(&self) -> bool {
        is_absolute_url(&self.path)
    }
}

/// Response headers for a redirect
///
/// `Location` always; for the permanent-redirect status code a companion
/// legacy-browser-compatibility `Refresh` header is added.
///
/// # Examples
///
/// ```
/// use caret_edge::{redirect_headers, Redirect};
///
/// let headers = redirect_headers(&Redirect {
///     path: "/news/abc".to_string(),
///     status_code: 308,
/// });
/// assert_eq!(headers[0].key, "Location");
/// assert_eq!(headers[1].key, "Refresh");
/// assert_eq!(headers[1].value, "0;url=/news/abc");
/// ```
pub fn redirect_headers(redirect: &Redirect) -> Vec<Header> {
    let mut headers = vec![Header {
        key: "Location".to_string(),
        value: redirect.path.clone(),
    }];
    if redirect.status_code == 308 {
        headers.push(Header {
            key: "Refresh".to_string(),
            value: format!("0;url={}", redirect.path),
        });
    }
    headers
}

/// Exact-host domain redirect
///
/// The matched target prefix is prepended onto the current URI verbatim;
/// no pattern compilation is involved.
pub fn resolve_domain_redirect(
    request: &EdgeRequest,
    domain_redirects: &BTreeMap<String, String>,
) -> Option<Redirect> {
    let host = request.host()?;
    let target = domain_redirects.get(host)?;
    Some(Redirect {
        path: format!("{}{}", target, request.uri),
        status_code: 308,
    })
}

/// Trailing-slash normalization
///
/// File-like requests (data routes, static assets) always normalize away
/// a trailing slash; page requests follow the build's trailing-slash
/// policy in either direction. The bare root is exempt so the redirect
/// can never loop.
pub fn trailing_slash_redirect(
    uri: &str,
    trailing_slash: bool,
    is_file: bool,
) -> Option<Redirect> {
    if uri == "/" {
        return None;
    }

    let path = if uri.ends_with('/') {
        if is_file || !trailing_slash {
            let trimmed = uri.trim_end_matches('/');
            // Slash-only paths reduce to the root, which is exempt
            if trimmed.is_empty() {
                return None;
            }
            trimmed.to_string()
        } else {
            return None;
        }
    } else {
        if is_file || !trailing_slash {
            return None;
        }
        format!("{}/", uri)
    };

    Some(Redirect {
        path,
        status_code: 308,
    })
}

/// Accept-Language redirect for the root path
///
/// Applies only when the request path is the (normalized) root, i18n is
/// configured and an Accept-Language header is present. The default
/// locale produces no redirect; an unparsable header produces none
/// either.
pub fn language_redirect(request: &EdgeRequest, i18n: Option<&I18n>) -> Option<Redirect> {
    let i18n = i18n?;
    let path = request.path();
    let is_root = path == "/" || path.trim_end_matches('/') == format!("/{}", i18n.default_locale);
    if !is_root {
        return None;
    }

    let header = request.accept_language()?;
    let locale = preferred_locale(header, &i18n.locales)?;
    if locale.eq_ignore_ascii_case(&i18n.default_locale) {
        return None;
    }
    Some(Redirect {
        path: format!("/{}", locale),
        status_code: 307,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn i18n() -> I18n {
        I18n {
            locales: vec!["en".to_string(), "fr".to_string(), "nl".to_string()],
            default_locale: "en".to_string(),
        }
    }

    #[test]
    fn test_is_external() {
        let internal = Redirect {
            path: "/news".to_string(),
            status_code: 308,
        };
        assert!(!internal.is_external());
        let external = Redirect {
            path: "https://example.com/news".to_string(),
            status_code: 308,
        };
        assert!(external.is_external());
    }

    #[test]
    fn test_refresh_header_only_for_permanent() {
        let permanent = Redirect {
            path: "/x".to_string(),
            status_code: 308,
        };
        assert_eq!(redirect_headers(&permanent).len(), 2);

        let temporary = Redirect {
            path: "/x".to_string(),
            status_code: 307,
        };
        assert_eq!(redirect_headers(&temporary).len(), 1);
    }

    #[test]
    fn test_domain_redirect_prefixes_uri_verbatim() {
        let mut table = BTreeMap::new();
        table.insert(
            "example.com".to_string(),
            "https://www.example.com".to_string(),
        );
        let request = EdgeRequest::new("/a/b?x=1").with_header("Host", "example.com");
        let redirect = resolve_domain_redirect(&request, &table).unwrap();
        assert_eq!(redirect.path, "https://www.example.com/a/b?x=1");
        assert_eq!(redirect.status_code, 308);

        let other = EdgeRequest::new("/a").with_header("Host", "other.com");
        assert_eq!(resolve_domain_redirect(&other, &table), None);
    }

    #[test]
    fn test_trailing_slash_page_policy_false() {
        let redirect = trailing_slash_redirect("/terms/", false, false).unwrap();
        assert_eq!(redirect.path, "/terms");
        assert_eq!(trailing_slash_redirect("/terms", false, false), None);
    }

    #[test]
    fn test_trailing_slash_page_policy_true() {
        let redirect = trailing_slash_redirect("/terms", true, false).unwrap();
        assert_eq!(redirect.path, "/terms/");
        assert_eq!(trailing_slash_redirect("/terms/", true, false), None);
    }

    #[test]
    fn test_trailing_slash_files_always_strip() {
        let redirect = trailing_slash_redirect("/logo.svg/", true, true).unwrap();
        assert_eq!(redirect.path, "/logo.svg");
        assert_eq!(trailing_slash_redirect("/logo.svg", true, true), None);
    }

    #[test]
    fn test_trailing_slash_root_is_exempt() {
        assert_eq!(trailing_slash_redirect("/", false, false), None);
        assert_eq!(trailing_slash_redirect("/", true, false), None);
    }

    #[test]
    fn test_slash_only_paths_never_redirect() {
        assert_eq!(trailing_slash_redirect("//", false, false), None);
        assert_eq!(trailing_slash_redirect("///", true, true), None);
    }

    #[test]
    fn test_language_redirect_for_root() {
        let request = EdgeRequest::new("/").with_header("Accept-Language", "fr");
        let redirect = language_redirect(&request, Some(&i18n())).unwrap();
        assert_eq!(redirect.path, "/fr");
    }

    #[test]
    fn test_language_redirect_default_locale_is_none() {
        let request = EdgeRequest::new("/").with_header("Accept-Language", "en-US");
        assert_eq!(language_redirect(&request, Some(&i18n())), None);
    }

    #[test]
    fn test_language_redirect_only_for_root() {
        let request = EdgeRequest::new("/terms").with_header("Accept-Language", "fr");
        assert_eq!(language_redirect(&request, Some(&i18n())), None);
    }

    #[test]
    fn test_language_redirect_without_header_or_i18n() {
        assert_eq!(language_redirect(&EdgeRequest::new("/"), Some(&i18n())), None);
        let request = EdgeRequest::new("/").with_header("Accept-Language", "fr");
        assert_eq!(language_redirect(&request, None), None);
    }
}
