//! # Caret Edge
//!
//! Request-time routing decision engine over prebuilt caret manifests.
//!
//! The routers consume the immutable manifests produced by
//! `caret-manifest` and turn each incoming URI into a terminal
//! [`Decision`]: serve a static artifact, invoke a render function,
//! proxy to an external origin, or fall back to a 404. Actual asset
//! fetches, render invocations and upstream proxying belong to external
//! collaborators; the engine's job ends at the decision.
//!
//! All pattern compilation happens once, at router construction. After
//! that everything is read-only: concurrent request handling shares one
//! router with no locking.
//!
//! ## Example
//!
//! ```
//! use caret_edge::{Decision, EdgeRequest, PageRouter};
//! use caret_manifest::{PageManifest, RoutesManifest};
//!
//! let mut manifest = PageManifest::default();
//! manifest
//!     .pages
//!     .html
//!     .non_dynamic
//!     .insert("/terms".to_string(), "pages/terms.html".to_string());
//!
//! let router = PageRouter::new(manifest, RoutesManifest::default()).unwrap();
//! let request = EdgeRequest::new("/terms");
//! let decision = router.resolve_page(&request, &request.uri, false, false);
//! assert!(matches!(decision, Decision::StaticFile { .. }));
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod api;
pub mod auth;
pub mod decision;
pub mod language;
pub mod normalize;
pub mod page;
pub mod redirect;
pub mod request;

mod rules;

pub use api::ApiRouter;
pub use auth::check_authorization;
pub use decision::{Decision, NotFoundFallback};
pub use language::{parse_accept_language, preferred_locale, LanguagePreference};
pub use normalize::{insert_default_locale, split_query};
pub use page::PageRouter;
pub use redirect::{
    language_redirect, redirect_headers, resolve_domain_redirect, trailing_slash_redirect,
    Redirect,
};
pub use request::EdgeRequest;
