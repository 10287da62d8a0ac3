//! Page decision engine
//!
//! `PageRouter` precompiles every stored pattern once at construction
//! (the global dynamic list, redirect/rewrite/header sources, SSG data
//! regexes) and is read-only afterwards; resolution borrows immutably,
//! so concurrent invocations share one router with no locking.
//!
//! Resolution is a fixed guard sequence, first match wins:
//!
//! 1. normalize (default-locale insertion, base-path strip)
//! 2. exact static HTML
//! 3. exact SSG artifact (bypassed in preview mode)
//! 4. exact SSR page
//! 5. rewrite, with exactly one level of internal recursion
//! 6. sorted dynamic scan, winner resolved ssg → ssr → html → catch-all
//! 7. 404 artifact, else the error-page render fallback
//!
//! Resolution never fails for a well-formed manifest; everything that
//! could go wrong at request time degrades to `NotFound`.

use regex::Regex;

use tracing::{debug, warn};

use caret_manifest::locale::locale_of;
use caret_manifest::{DynamicRoute, DynamicStaticGenRoute, Header, PageManifest, RoutesManifest};
use caret_routes::{
    compile_destination, compile_source, is_absolute_url, normalize_path, PatternError,
};

use crate::decision::{Decision, NotFoundFallback};
use crate::normalize::{insert_default_locale, split_query};
use crate::redirect::Redirect;
use crate::request::EdgeRequest;
use crate::rules::{
    compile_headers, compile_redirects, compile_rewrites, first_rewrite, CompiledHeader,
    CompiledRedirect, CompiledRewrite,
};

/// Routing tables for page requests, precompiled from the manifests
pub struct PageRouter {
    manifest: PageManifest,
    routes: RoutesManifest,
    /// Globally sorted dynamic routes with their compiled patterns
    dynamic: Vec<(DynamicRoute, Regex)>,
    /// Dynamic SSG data routes, in the same global order
    data_dynamic: Vec<(String, DynamicStaticGenRoute, Regex)>,
    redirects: Vec<CompiledRedirect>,
    rewrites: Vec<CompiledRewrite>,
    headers: Vec<CompiledHeader>,
}

impl PageRouter {
    pub fn new(
        manifest: PageManifest,
        routes: RoutesManifest,
    ) -> Result<Self, PatternError> {
        let dynamic = manifest
            .pages
            .dynamic
            .iter()
            .map(|route| {
                let regex = compile_source(&route.route, &route.regex)?;
                Ok((route.clone(), regex))
            })
            .collect::<Result<Vec<_>, PatternError>>()?;

        let data_dynamic = manifest
            .pages
            .dynamic
            .iter()
            .filter_map(|route| {
                let ssg = manifest.pages.ssg.dynamic.get(&route.route)?;
                Some(compile_source(&route.route, &ssg.data_route_regex).map(|regex| {
                    (route.route.clone(), ssg.clone(), regex)
                }))
            })
            .collect::<Result<Vec<_>, PatternError>>()?;

        let redirects = compile_redirects(&routes.redirects)?;
        let rewrites = compile_rewrites(&routes.rewrites)?;
        let headers = compile_headers(&routes.headers)?;

        Ok(Self {
            manifest,
            routes,
            dynamic,
            data_dynamic,
            redirects,
            rewrites,
            headers,
        })
    }

    pub fn page_manifest(&self) -> &PageManifest {
        &self.manifest
    }

    pub fn routes_manifest(&self) -> &RoutesManifest {
        &self.routes
    }

    // ========================================================================
    // Redirect / rewrite / header rules
    // ========================================================================

    /// First matching redirect rule for the request, in declaration order
    ///
    /// Scanning stops at the first source match; a destination that fails
    /// to compile makes that rule inapplicable, it does not fall through
    /// to later rules.
    pub fn resolve_redirect(&self, request: &EdgeRequest) -> Option<Redirect> {
        let (path, _) = split_query(&request.uri);
        let path = normalize_path(path);
        let path = self.without_locale(&path);

        for rule in &self.redirects {
            if let Some(params) = rule.pattern.params(&path) {
                return match compile_destination(&rule.destination, &params) {
                    Some(destination) => {
                        debug!(source = %rule.source, path = %destination, "redirect matched");
                        Some(Redirect {
                            path: destination,
                            status_code: rule.status_code,
                        })
                    }
                    None => {
                        warn!(
                            source = %rule.source,
                            destination = %rule.destination,
                            "redirect destination failed to compile; rule inapplicable"
                        );
                        None
                    }
                };
            }
        }
        None
    }

    /// First matching rewrite destination for a path
    pub fn resolve_rewrite(&self, uri: &str) -> Option<String> {
        let (path, _) = split_query(uri);
        let path = normalize_path(path);
        first_rewrite(&self.rewrites, &self.without_locale(&path))
    }

    /// Every matching header rule, in declaration order
    ///
    /// Header rules are additive, unlike first-match redirects.
    pub fn resolve_headers(&self, uri: &str) -> Vec<Header> {
        let (path, _) = split_query(uri);
        let path = normalize_path(path);
        self.headers
            .iter()
            .filter(|rule| rule.pattern.test(&path))
            .flat_map(|rule| rule.headers.iter().cloned())
            .collect()
    }

    // ========================================================================
    // Page resolution
    // ========================================================================

    /// Resolves a page request to its terminal decision
    ///
    /// `is_rewrite` is the recursion guard: exactly one level of internal
    /// rewrite recursion is permitted, and the second-level target is
    /// final (it resolves as a plain page path or becomes `NotFound`).
    pub fn resolve_page(
        &self,
        request: &EdgeRequest,
        uri: &str,
        preview: bool,
        is_rewrite: bool,
    ) -> Decision {
        let (raw_path, _) = split_query(uri);
        let raw_path = normalize_path(raw_path);
        let (path, base_missing) = self.strip_base_path(&raw_path);
        let localized = insert_default_locale(path, self.routes.i18n.as_ref());

        if !base_missing {
            if let Some(file) = self.manifest.pages.html.non_dynamic.get(&localized) {
                debug!(path = %localized, file = %file, "static html page");
                return Decision::static_file(file.clone(), self.error_status(&localized));
            }

            if !preview {
                if let Some(route) = self.manifest.pages.ssg.non_dynamic.get(&localized) {
                    debug!(path = %localized, "prerendered page");
                    return Decision::StaticFile {
                        file: html_artifact(&localized),
                        status_code: None,
                        revalidate_seconds: route.revalidate_seconds,
                        fallback: None,
                    };
                }
            }

            if let Some(page) = self.manifest.pages.ssr.non_dynamic.get(&localized) {
                debug!(path = %localized, page = %page, "server-rendered page");
                return Decision::Render { page: page.clone() };
            }
        }

        if !is_rewrite {
            // Rules are authored without locale prefixes, so rewrite
            // matching sees the same locale-stripped path the standalone
            // resolvers do
            let rewrite_path = self.without_locale(&raw_path);
            if let Some(destination) = first_rewrite(&self.rewrites, &rewrite_path) {
                if is_absolute_url(&destination) {
                    let (proxy_path, proxy_query) = split_query(&destination);
                    let querystring = proxy_query
                        .map(str::to_string)
                        .or_else(|| request.querystring().map(str::to_string));
                    debug!(path = %proxy_path, "external rewrite");
                    return Decision::ExternalProxy {
                        path: proxy_path.to_string(),
                        querystring,
                    };
                }
                debug!(from = %raw_path, to = %destination, "internal rewrite");
                return self.resolve_page(request, &destination, preview, true);
            }
        }

        if !base_missing {
            for (route, regex) in &self.dynamic {
                if regex.is_match(&localized) {
                    return self.resolve_dynamic(&route.route, &localized, preview);
                }
            }
        }

        self.not_found(&localized)
    }

    /// Resolves a matched dynamic template against the owning bucket
    ///
    /// Bucket priority is fixed: ssg → ssr → html → ssr catch-all.
    fn resolve_dynamic(&self, template: &str, path: &str, preview: bool) -> Decision {
        if !preview {
            if let Some(ssg) = self.manifest.pages.ssg.dynamic.get(template) {
                debug!(template = %template, path = %path, "prerendered dynamic page");
                return Decision::StaticFile {
                    file: html_artifact(path),
                    status_code: None,
                    revalidate_seconds: None,
                    fallback: Some(ssg.fallback.clone()),
                };
            }
        }
        if let Some(page) = self.manifest.pages.ssr.dynamic.get(template) {
            debug!(template = %template, "server-rendered dynamic page");
            return Decision::Render {
                page: page.file.clone(),
            };
        }
        if let Some(page) = self.manifest.pages.html.dynamic.get(template) {
            debug!(template = %template, "static dynamic page");
            return Decision::static_file(page.file.clone(), None);
        }
        if let Some(page) = self.manifest.pages.ssr.catch_all.get(template) {
            debug!(template = %template, "catch-all page");
            return Decision::Render {
                page: page.file.clone(),
            };
        }
        self.not_found(path)
    }

    // ========================================================================
    // Data routes
    // ========================================================================

    /// Resolves an SSG data request (`/_next/data/<buildId>/….json`)
    ///
    /// Exact non-dynamic data routes first, then the dynamic list in
    /// global order; preview mode bypasses the static artifacts and
    /// renders the source page instead.
    pub fn resolve_data(&self, uri: &str, preview: bool) -> Decision {
        let (path, _) = split_query(uri);
        let path = normalize_path(path);
        let prefix = format!("/_next/data/{}/", self.manifest.build_id);

        let Some(rest) = path.strip_prefix(&prefix) else {
            return self.not_found(&path);
        };

        for (route, ssg) in &self.manifest.pages.ssg.non_dynamic {
            if ssg.data_route == *path {
                if preview {
                    let page = ssg.src_route.clone().unwrap_or_else(|| route.clone());
                    debug!(path = %path, page = %page, "preview data request");
                    return Decision::Render { page };
                }
                debug!(path = %path, "prerendered data");
                return Decision::StaticFile {
                    file: format!("pages/{}", rest),
                    status_code: None,
                    revalidate_seconds: ssg.revalidate_seconds,
                    fallback: None,
                };
            }
        }

        for (route, ssg, regex) in &self.data_dynamic {
            if regex.is_match(&path) {
                if preview {
                    debug!(path = %path, page = %route, "preview data request");
                    return Decision::Render {
                        page: route.clone(),
                    };
                }
                debug!(path = %path, template = %route, "prerendered dynamic data");
                return Decision::StaticFile {
                    file: format!("pages/{}", rest),
                    status_code: None,
                    revalidate_seconds: None,
                    fallback: Some(ssg.fallback.clone()),
                };
            }
        }

        self.not_found(&path)
    }

    // ========================================================================
    // Normalization and fallbacks
    // ========================================================================

    /// Splits the configured base path off the request path
    ///
    /// A configured base that is absent from the request suppresses
    /// manifest matching (the flag) but not rewrite rules, whose sources
    /// carry the base prefix themselves.
    fn strip_base_path<'a>(&self, path: &'a str) -> (&'a str, bool) {
        let base = self.routes.base_path.as_str();
        if base.is_empty() {
            return (path, false);
        }
        if path == base {
            return ("/", false);
        }
        match path.strip_prefix(base) {
            Some(rest) if rest.starts_with('/') => (rest, false),
            _ => (path, true),
        }
    }

    /// Strips any configured locale prefix
    fn without_locale(&self, path: &str) -> String {
        if let Some(i18n) = &self.routes.i18n {
            if let Some(locale) = locale_of(path, &i18n.locales) {
                let rest = &path[1 + locale.len()..];
                return if rest.is_empty() {
                    "/".to_string()
                } else {
                    rest.to_string()
                };
            }
        }
        path.to_string()
    }

    /// Status override for the error-page artifacts
    fn error_status(&self, localized: &str) -> Option<u16> {
        match self.without_locale(localized).as_str() {
            "/404" => Some(404),
            "/500" => Some(500),
            _ => None,
        }
    }

    /// 404 artifact lookup, locale variant first, else the error render
    fn not_found(&self, path: &str) -> Decision {
        if let Some(i18n) = &self.routes.i18n {
            if let Some(locale) = locale_of(path, &i18n.locales) {
                let candidate = format!("/{}/404", locale);
                if let Some(file) = self.manifest.pages.html.non_dynamic.get(&candidate) {
                    debug!(path = %path, file = %file, "not found, localized 404 artifact");
                    return Decision::NotFound {
                        fallback: NotFoundFallback::Static { file: file.clone() },
                    };
                }
            }
        }
        if let Some(file) = self.manifest.pages.html.non_dynamic.get("/404") {
            debug!(path = %path, file = %file, "not found, 404 artifact");
            return Decision::NotFound {
                fallback: NotFoundFallback::Static { file: file.clone() },
            };
        }
        debug!(path = %path, "not found, error page fallback");
        Decision::NotFound {
            fallback: NotFoundFallback::Render {
                page: "_error".to_string(),
            },
        }
    }
}

/// Generated HTML artifact name for a page path
///
/// The root path maps to the `index` artifact.
fn html_artifact(path: &str) -> String {
    if path == "/" {
        "pages/index.html".to_string()
    } else {
        format!("pages{}.html", path)
    }
}
