//! Raw build outputs consumed by the manifest builder
//!
//! These are schemas only: the build pipeline that produces them is an
//! external collaborator. Declarations carry no precompiled regexes;
//! the builder compiles test-patterns when it prepares the manifests.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::manifest::{Authentication, Fallback, Header, I18n, StaticGenRoute};

/// Deploy-level options supplied by the packaging step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOptions {
    /// Build identifier, used to construct data-route URLs
    pub build_id: String,
    /// Host → target-prefix table; hosts may be given with a scheme,
    /// which the builder normalizes away
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub domain_redirects: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<Authentication>,
}

/// Subset of the framework build config the router cares about
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkConfig {
    #[serde(default)]
    pub trailing_slash: bool,
}

/// Routing configuration authored in the build config
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutesConfig {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub base_path: String,
    /// Declaration order is significant and is preserved
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub redirects: Vec<RedirectDecl>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rewrites: Vec<RewriteDecl>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<HeaderDecl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i18n: Option<I18n>,
}

/// An authored redirect declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectDecl {
    pub source: String,
    pub destination: String,
    #[serde(default = "default_redirect_status")]
    pub status_code: u16,
}

fn default_redirect_status() -> u16 {
    308
}

/// An authored rewrite declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteDecl {
    pub source: String,
    pub destination: String,
}

/// An authored header declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderDecl {
    pub source: String,
    pub headers: Vec<Header>,
}

/// Prerender metadata emitted by the build tool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrerenderedRoutes {
    /// Concrete prerendered paths
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub routes: BTreeMap<String, StaticGenRoute>,
    /// Dynamic SSG route templates
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dynamic_routes: BTreeMap<String, PrerenderedDynamicRoute>,
}

/// Dynamic SSG metadata as emitted upstream
///
/// The build tool usually supplies both regexes; when either is missing
/// the manifest builder regenerates it with the pattern compiler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrerenderedDynamicRoute {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_regex: Option<String>,
    pub data_route: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_route_regex: Option<String>,
    #[serde(default)]
    pub fallback: Fallback,
}

impl Default for RedirectDecl {
    fn default() -> Self {
        Self {
            source: String::new(),
            destination: String::new(),
            status_code: default_redirect_status(),
        }
    }
}
