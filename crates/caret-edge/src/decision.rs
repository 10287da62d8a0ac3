//! Routing decisions
//!
//! The router's job ends at producing one of these; fetching files,
//! invoking renders and proxying upstream belong to external
//! collaborators. Decisions serialize so handlers can snapshot them.

use serde::Serialize;

use caret_manifest::Fallback;

/// The terminal routing decision for one request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Decision {
    /// Serve a build artifact from storage
    #[serde(rename_all = "camelCase")]
    StaticFile {
        file: String,
        /// Status override for error artifacts (`/404`, `/500`)
        #[serde(skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
        /// Revalidation period for SSG artifacts
        #[serde(skip_serializing_if = "Option::is_none")]
        revalidate_seconds: Option<u32>,
        /// Fallback behavior for dynamic SSG matches
        #[serde(skip_serializing_if = "Option::is_none")]
        fallback: Option<Fallback>,
    },
    /// Invoke a render function
    #[serde(rename_all = "camelCase")]
    Render { page: String },
    /// Proxy to an external origin, preserving the split query string
    #[serde(rename_all = "camelCase")]
    ExternalProxy {
        path: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        querystring: Option<String>,
    },
    /// Nothing matched
    #[serde(rename_all = "camelCase")]
    NotFound { fallback: NotFoundFallback },
}

impl Decision {
    /// Plain static file decision without SSG metadata
    pub(crate) fn static_file(file: String, status_code: Option<u16>) -> Self {
        Decision::StaticFile {
            file,
            status_code,
            revalidate_seconds: None,
            fallback: None,
        }
    }
}

/// How a NotFound decision degrades
///
/// A declared 404 artifact serves statically; otherwise the generic
/// error page renders. An absent artifact never fails the request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NotFoundFallback {
    #[serde(rename_all = "camelCase")]
    Static { file: String },
    #[serde(rename_all = "camelCase")]
    Render { page: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_serializes_tagged() {
        let decision = Decision::static_file("pages/terms.html".to_string(), None);
        let json = serde_json::to_string(&decision).unwrap();
        assert_eq!(json, r#"{"kind":"staticFile","file":"pages/terms.html"}"#);

        let decision = Decision::NotFound {
            fallback: NotFoundFallback::Render {
                page: "_error".to_string(),
            },
        };
        let json = serde_json::to_string(&decision).unwrap();
        assert!(json.contains(r#""kind":"notFound""#), "{}", json);
    }
}
