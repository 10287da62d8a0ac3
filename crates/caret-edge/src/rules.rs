//! Precompiled redirect/rewrite/header rule tables
//!
//! Manifests store pattern source strings; routers compile every rule
//! exactly once at construction and then only read. Rule scanning is
//! order-preserving: the first matching source wins, and a destination
//! that fails to compile makes the matched rule inapplicable (no
//! fall-through to later rules, mirroring the upstream handler).

use tracing::warn;

use caret_manifest::{Header, HeaderRule, RedirectRule, RewriteRule};
use caret_routes::{compile_destination, CompiledPattern, PatternError};

pub(crate) struct CompiledRedirect {
    pub source: String,
    pub destination: String,
    pub status_code: u16,
    pub pattern: CompiledPattern,
}

pub(crate) struct CompiledRewrite {
    pub source: String,
    pub destination: String,
    pub pattern: CompiledPattern,
}

pub(crate) struct CompiledHeader {
    pub headers: Vec<Header>,
    pub pattern: CompiledPattern,
}

pub(crate) fn compile_redirects(
    rules: &[RedirectRule],
) -> Result<Vec<CompiledRedirect>, PatternError> {
    rules
        .iter()
        .map(|rule| {
            Ok(CompiledRedirect {
                source: rule.source.clone(),
                destination: rule.destination.clone(),
                status_code: rule.status_code,
                pattern: CompiledPattern::compile(&rule.source)?,
            })
        })
        .collect()
}

pub(crate) fn compile_rewrites(
    rules: &[RewriteRule],
) -> Result<Vec<CompiledRewrite>, PatternError> {
    rules
        .iter()
        .map(|rule| {
            Ok(CompiledRewrite {
                source: rule.source.clone(),
                destination: rule.destination.clone(),
                pattern: CompiledPattern::compile(&rule.source)?,
            })
        })
        .collect()
}

pub(crate) fn compile_headers(
    rules: &[HeaderRule],
) -> Result<Vec<CompiledHeader>, PatternError> {
    rules
        .iter()
        .map(|rule| {
            Ok(CompiledHeader {
                headers: rule.headers.clone(),
                pattern: CompiledPattern::compile(&rule.source)?,
            })
        })
        .collect()
}

/// First-match rewrite scan over an ordered rule table
pub(crate) fn first_rewrite(rules: &[CompiledRewrite], path: &str) -> Option<String> {
    for rule in rules {
        if let Some(params) = rule.pattern.params(path) {
            return match compile_destination(&rule.destination, &params) {
                Some(destination) => Some(destination),
                None => {
                    warn!(
                        source = %rule.source,
                        destination = %rule.destination,
                        "rewrite destination failed to compile; rule inapplicable"
                    );
                    None
                }
            };
        }
    }
    None
}
