//! API decision engine
//!
//! Structurally a slimmer sibling of the page router: API routes carry
//! no locale prefixes, no static artifacts and no SSG, so resolution is
//! exact match, one bounded rewrite recursion, then the sorted dynamic
//! scan. Every hit renders; there is nothing to serve statically.

use regex::Regex;

use tracing::debug;

use caret_manifest::{ApiManifest, RoutesManifest};
use caret_routes::{compile_source, is_absolute_url, normalize_path, PatternError};

use crate::decision::{Decision, NotFoundFallback};
use crate::normalize::split_query;
use crate::request::EdgeRequest;
use crate::rules::{compile_rewrites, first_rewrite, CompiledRewrite};

/// Routing tables for API requests, precompiled from the manifests
pub struct ApiRouter {
    manifest: ApiManifest,
    base_path: String,
    /// Sorted dynamic API routes with their compiled patterns
    dynamic: Vec<(String, Regex)>,
    rewrites: Vec<CompiledRewrite>,
}

impl ApiRouter {
    pub fn new(manifest: ApiManifest, routes: &RoutesManifest) -> Result<Self, PatternError> {
        let dynamic = manifest
            .apis
            .dynamic
            .iter()
            .map(|route| {
                let regex = compile_source(&route.file, &route.regex)?;
                Ok((route.file.clone(), regex))
            })
            .collect::<Result<Vec<_>, PatternError>>()?;

        let rewrites = compile_rewrites(&routes.rewrites)?;

        Ok(Self {
            manifest,
            base_path: routes.base_path.clone(),
            dynamic,
            rewrites,
        })
    }

    pub fn api_manifest(&self) -> &ApiManifest {
        &self.manifest
    }

    /// Resolves an API request to its terminal decision
    ///
    /// `is_rewrite` is the same single-level recursion guard the page
    /// router carries.
    pub fn resolve_api(&self, request: &EdgeRequest, uri: &str, is_rewrite: bool) -> Decision {
        let (raw_path, _) = split_query(uri);
        let raw_path = normalize_path(raw_path);
        let (path, base_missing) = self.strip_base_path(&raw_path);

        if !base_missing {
            if let Some(file) = self.manifest.apis.non_dynamic.get(path) {
                debug!(path = %path, file = %file, "api route");
                return Decision::Render { page: file.clone() };
            }
        }

        if !is_rewrite {
            if let Some(destination) = first_rewrite(&self.rewrites, &raw_path) {
                if is_absolute_url(&destination) {
                    let (proxy_path, proxy_query) = split_query(&destination);
                    let querystring = proxy_query
                        .map(str::to_string)
                        .or_else(|| request.querystring().map(str::to_string));
                    debug!(path = %proxy_path, "external api rewrite");
                    return Decision::ExternalProxy {
                        path: proxy_path.to_string(),
                        querystring,
                    };
                }
                debug!(from = %raw_path, to = %destination, "internal api rewrite");
                return self.resolve_api(request, &destination, true);
            }
        }

        if !base_missing {
            for (file, regex) in &self.dynamic {
                if regex.is_match(path) {
                    debug!(path = %path, file = %file, "dynamic api route");
                    return Decision::Render { page: file.clone() };
                }
            }
        }

        debug!(path = %path, "api route not found");
        Decision::NotFound {
            fallback: NotFoundFallback::Render {
                page: "_error".to_string(),
            },
        }
    }

    fn strip_base_path<'a>(&self, path: &'a str) -> (&'a str, bool) {
        let base = self.base_path.as_str();
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
}
