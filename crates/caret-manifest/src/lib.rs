//! # Caret Manifest
//!
//! Build-time routing manifests for the caret routing engine.
//!
//! The builder consumes a framework's raw build outputs (flat route→file
//! mapping, prerender metadata, i18n config, redirect/rewrite/header
//! declarations) once at deploy time and produces immutable, serializable
//! manifests. At request time the manifests are read-only: the model is
//! "share everything, mutate nothing".
//!
//! Manifests serialize to the build tool's camelCase JSON artifact format
//! and round-trip through `serde_json`.
//!
//! ## Example
//!
//! ```
//! use caret_manifest::{build, BuildOptions, FrameworkConfig, PrerenderedRoutes, RoutesConfig};
//! use std::collections::BTreeMap;
//!
//! let mut raw_routes = BTreeMap::new();
//! raw_routes.insert("/terms".to_string(), "pages/terms.html".to_string());
//! raw_routes.insert("/users/[id]".to_string(), "pages/users/[id].js".to_string());
//!
//! let output = build(
//!     &BuildOptions { build_id: "build-1".to_string(), ..Default::default() },
//!     &FrameworkConfig::default(),
//!     &RoutesConfig::default(),
//!     &raw_routes,
//!     &PrerenderedRoutes::default(),
//!     &[],
//! )
//! .unwrap();
//!
//! assert_eq!(
//!     output.page_manifest.pages.html.non_dynamic.get("/terms"),
//!     Some(&"pages/terms.html".to_string())
//! );
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod builder;
pub mod classify;
pub mod input;
pub mod locale;
pub mod manifest;

pub use builder::{build, prepare_routes_manifest, BuildOutput};
pub use classify::{classify_page, PageClass, PageKind, RouteShape};
pub use input::{
    BuildOptions, FrameworkConfig, HeaderDecl, PrerenderedDynamicRoute, PrerenderedRoutes,
    RedirectDecl, RewriteDecl, RoutesConfig,
};
pub use manifest::{
    ApiManifest, ApiRoute, Apis, AssetManifest, Authentication, DynamicRoute,
    DynamicStaticGenRoute, Fallback, Header, HeaderRule, HtmlPages, I18n, PageFile, PageManifest,
    Pages, RedirectRule, RewriteRule, RoutesManifest, SsgPages, SsrPages, StaticGenRoute,
};
