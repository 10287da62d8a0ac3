//! Specificity ordering for dynamic route templates
//!
//! When the router scans dynamic routes linearly, the first structural
//! match must also be the most specific one. This module defines the
//! total order that guarantees it: static segments outrank dynamic ones,
//! plain dynamic segments outrank catch-alls, and catch-alls outrank
//! optional catch-alls, compared position by position from the root.
//! All functions are **pure**: no hidden state, restartable.

use std::cmp::Ordering;

use crate::segment::{parse_template, Segment};

/// Specificity tier of a single segment (lower sorts first)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SegmentRank {
    Static,
    Param,
    CatchAll,
    OptionalCatchAll,
}

fn rank(segment: &Segment) -> SegmentRank {
    match segment {
        Segment::Static(_) => SegmentRank::Static,
        Segment::Param { .. } => SegmentRank::Param,
        Segment::CatchAll(_) => SegmentRank::CatchAll,
        Segment::OptionalCatchAll(_) => SegmentRank::OptionalCatchAll,
    }
}

/// Compares two route templates by per-segment specificity (pure function)
///
/// Rules, applied segment by segment from the root:
/// 1. A static segment outranks a dynamic segment at the same position.
/// 2. Among dynamic segments: plain parameter < catch-all < optional
///    catch-all.
/// 3. Equal-kind static segments compare lexicographically.
/// 4. When one route is a strict segment-prefix of the other, the shorter
///    sorts first.
/// 5. Full ties fall back to whole-string ordering, so the order is total.
///
/// Shorter paths are not inherently preferred over longer ones:
/// specificity per segment dominates.
///
/// # Examples
///
/// ```
/// use caret_routes::compare_routes;
/// use std::cmp::Ordering;
///
/// assert_eq!(compare_routes("/docs/[id]", "/docs/[...slug]"), Ordering::Less);
/// assert_eq!(compare_routes("/a/:x/c", "/a/b/:y"), Ordering::Greater);
/// ```
pub fn compare_routes(a: &str, b: &str) -> Ordering {
    let segments_a = parse_template(a);
    let segments_b = parse_template(b);

    for (x, y) in segments_a.iter().zip(segments_b.iter()) {
        match rank(x).cmp(&rank(y)) {
            Ordering::Equal => {}
            other => return other,
        }
        if let (Segment::Static(p), Segment::Static(q)) = (x, y) {
            match p.cmp(q) {
                Ordering::Equal => {}
                other => return other,
            }
        }
    }

    match segments_a.len().cmp(&segments_b.len()) {
        Ordering::Equal => a.cmp(b),
        other => other,
    }
}

/// Orders route templates by specificity (pure function)
///
/// Total, deterministic, idempotent and insensitive to input order.
///
/// # Examples
///
/// ```
/// use caret_routes::sort_routes;
///
/// let sorted = sort_routes(vec![
///     "/docs/[[...rest]]".to_string(),
///     "/docs/[...slug]".to_string(),
///     "/docs/[id]".to_string(),
///     "/docs/intro".to_string(),
/// ]);
/// assert_eq!(
///     sorted,
///     vec!["/docs/intro", "/docs/[id]", "/docs/[...slug]", "/docs/[[...rest]]"]
/// );
/// ```
pub fn sort_routes<I>(routes: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut sorted: Vec<String> = routes.into_iter().collect();
    sorted.sort_by(|a, b| compare_routes(a, b));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_outranks_dynamic() {
        assert_eq!(compare_routes("/docs/intro", "/docs/[id]"), Ordering::Less);
    }

    #[test]
    fn test_param_outranks_catch_all() {
        assert_eq!(
            compare_routes("/docs/[id]", "/docs/[...slug]"),
            Ordering::Less
        );
    }

    #[test]
    fn test_catch_all_outranks_optional_catch_all() {
        assert_eq!(
            compare_routes("/docs/[...slug]", "/docs/[[...slug]]"),
            Ordering::Less
        );
    }

    #[test]
    fn test_specificity_dominates_length() {
        // Static second segment wins even with a dynamic tail
        assert_eq!(compare_routes("/a/b/:y", "/a/:x"), Ordering::Less);
    }

    #[test]
    fn test_prefix_sorts_first() {
        assert_eq!(compare_routes("/a/b", "/a/b/c"), Ordering::Less);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let routes = vec![
            "/docs/[...slug]".to_string(),
            "/blog/:slug".to_string(),
            "/docs/[id]".to_string(),
            "/[[...rest]]".to_string(),
        ];
        let once = sort_routes(routes.clone());
        let twice = sort_routes(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_sort_is_input_order_insensitive() {
        let forward = vec![
            "/docs/[id]".to_string(),
            "/docs/[...slug]".to_string(),
            "/blog/:slug".to_string(),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(sort_routes(forward), sort_routes(reversed));
    }
}
