//! # Caret Routes
//!
//! Route template compilation and ordering for the caret routing engine.
//!
//! A route template is an absolute path whose segments may be:
//! - Static text (`/terms`)
//! - Named parameters (`/users/:id` or `/users/[id]`)
//! - Constrained parameters (`/users/:id(\d+)`)
//! - Catch-all segments (`/docs/[...slug]`, one or more segments)
//! - Optional catch-all segments (`/docs/[[...slug]]`, zero or more segments)
//!
//! ## Functional Programming Approach
//!
//! Everything in this crate is a **pure function**: same input → same
//! output, no side effects, no hidden state. Templates compile to exactly
//! one test-pattern and one parameter-ordered reverse compiler, so routing
//! tables built from them can be shared freely between request handlers.
//!
//! ## Example
//!
//! ```
//! use caret_routes::{CompiledPattern, build_path, sort_routes};
//! use std::collections::HashMap;
//!
//! let pattern = CompiledPattern::compile("/blog/:slug").unwrap();
//! assert!(pattern.test("/blog/hello-world"));
//!
//! let params = pattern.params("/blog/hello-world").unwrap();
//! assert_eq!(params.get("slug"), Some(&"hello-world".to_string()));
//!
//! // Reverse compilation round-trips through the test pattern
//! let path = build_path("/blog/:slug", &params).unwrap();
//! assert!(pattern.test(&path));
//!
//! // More specific routes sort first
//! let sorted = sort_routes(vec![
//!     "/docs/[...slug]".to_string(),
//!     "/docs/[id]".to_string(),
//! ]);
//! assert_eq!(sorted, vec!["/docs/[id]", "/docs/[...slug]"]);
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod destination;
pub mod path;
pub mod pattern;
pub mod segment;
pub mod sort;

pub use destination::{build_path, compile_destination, is_absolute_url};
pub use path::{has_catch_all, is_dynamic_route, is_valid_path, normalize_path};
pub use pattern::{compile_source, pattern_str, CompiledPattern, PatternError};
pub use segment::{classify_segment, optional_catch_all_base, parse_template, Segment};
pub use sort::{compare_routes, sort_routes};
