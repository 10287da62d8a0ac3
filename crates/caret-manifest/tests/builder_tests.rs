//! Integration tests for the manifest builder
//!
//! Covers classification dispatch, optional catch-all base entries, the
//! SSG merge, locale materialization (additive), the sorted dynamic scan
//! lists, public files and JSON round-trips of the produced manifests.

use std::collections::BTreeMap;

use caret_manifest::{
    build, prepare_routes_manifest, BuildOptions, Fallback, FrameworkConfig, I18n,
    PrerenderedDynamicRoute, PrerenderedRoutes, RedirectDecl, RoutesConfig, StaticGenRoute,
};
use pretty_assertions::assert_eq;

fn raw_routes() -> BTreeMap<String, String> {
    let mut routes = BTreeMap::new();
    routes.insert("/".to_string(), "pages/index.html".to_string());
    routes.insert("/terms".to_string(), "pages/terms.html".to_string());
    routes.insert("/blog/[slug]".to_string(), "pages/blog/[slug].html".to_string());
    routes.insert("/users/[id]".to_string(), "pages/users/[id].js".to_string());
    routes.insert("/docs/[id]".to_string(), "pages/docs/[id].js".to_string());
    routes.insert("/docs/[...slug]".to_string(), "pages/docs/[...slug].js".to_string());
    routes.insert(
        "/help/[[...topic]]".to_string(),
        "pages/help/[[...topic]].js".to_string(),
    );
    routes.insert("/api/health".to_string(), "pages/api/health.js".to_string());
    routes.insert(
        "/api/users/[id]".to_string(),
        "pages/api/users/[id].js".to_string(),
    );
    routes
}

fn prerender() -> PrerenderedRoutes {
    let mut routes = BTreeMap::new();
    routes.insert(
        "/about".to_string(),
        StaticGenRoute {
            data_route: "/_next/data/b1/about.json".to_string(),
            revalidate_seconds: Some(60),
            src_route: None,
        },
    );
    let mut dynamic_routes = BTreeMap::new();
    dynamic_routes.insert(
        "/posts/[slug]".to_string(),
        PrerenderedDynamicRoute {
            route_regex: None,
            data_route: "/_next/data/b1/posts/[slug].json".to_string(),
            data_route_regex: None,
            fallback: Fallback::Disabled,
        },
    );
    PrerenderedRoutes {
        routes,
        dynamic_routes,
    }
}

fn options() -> BuildOptions {
    BuildOptions {
        build_id: "b1".to_string(),
        ..Default::default()
    }
}

#[test]
fn test_classification_dispatch() {
    let output = build(
        &options(),
        &FrameworkConfig::default(),
        &RoutesConfig::default(),
        &raw_routes(),
        &PrerenderedRoutes::default(),
        &[],
    )
    .unwrap();

    let pages = &output.page_manifest.pages;
    assert_eq!(
        pages.html.non_dynamic.get("/terms"),
        Some(&"pages/terms.html".to_string())
    );
    assert!(pages.html.dynamic.contains_key("/blog/[slug]"));
    assert!(pages.ssr.dynamic.contains_key("/users/[id]"));
    assert!(pages.ssr.catch_all.contains_key("/docs/[...slug]"));
    assert!(pages.ssr.catch_all.contains_key("/help/[[...topic]]"));
    assert!(!pages.ssr.dynamic.contains_key("/docs/[...slug]"));

    let apis = &output.api_manifest.apis;
    assert_eq!(
        apis.non_dynamic.get("/api/health"),
        Some(&"pages/api/health.js".to_string())
    );
    assert_eq!(apis.dynamic.len(), 1);
    assert_eq!(apis.dynamic[0].file, "pages/api/users/[id].js");
}

#[test]
fn test_optional_catch_all_registers_base_entry() {
    let output = build(
        &options(),
        &FrameworkConfig::default(),
        &RoutesConfig::default(),
        &raw_routes(),
        &PrerenderedRoutes::default(),
        &[],
    )
    .unwrap();

    // The base path with the catch-all stripped resolves non-dynamically
    assert_eq!(
        output.page_manifest.pages.ssr.non_dynamic.get("/help"),
        Some(&"pages/help/[[...topic]].js".to_string())
    );
}

#[test]
fn test_explicit_static_entry_wins_over_synthesized_base() {
    let mut routes = raw_routes();
    routes.insert("/help".to_string(), "pages/help.js".to_string());

    let output = build(
        &options(),
        &FrameworkConfig::default(),
        &RoutesConfig::default(),
        &routes,
        &PrerenderedRoutes::default(),
        &[],
    )
    .unwrap();

    assert_eq!(
        output.page_manifest.pages.ssr.non_dynamic.get("/help"),
        Some(&"pages/help.js".to_string())
    );
}

#[test]
fn test_ssg_merge_and_regex_regeneration() {
    let output = build(
        &options(),
        &FrameworkConfig::default(),
        &RoutesConfig::default(),
        &raw_routes(),
        &prerender(),
        &[],
    )
    .unwrap();

    let ssg = &output.page_manifest.pages.ssg;
    assert_eq!(
        ssg.non_dynamic.get("/about").unwrap().revalidate_seconds,
        Some(60)
    );

    let dynamic = ssg.dynamic.get("/posts/[slug]").unwrap();
    let route_regex = caret_routes::compile_source("t", &dynamic.route_regex).unwrap();
    assert!(route_regex.is_match("/posts/abc"));
    let data_regex = caret_routes::compile_source("t", &dynamic.data_route_regex).unwrap();
    assert!(data_regex.is_match("/_next/data/b1/posts/abc.json"));
}

#[test]
fn test_ssg_merge_strips_default_locale_prefix() {
    let mut prerender = prerender();
    prerender.routes.insert(
        "/en/pricing".to_string(),
        StaticGenRoute {
            data_route: "/_next/data/b1/en/pricing.json".to_string(),
            revalidate_seconds: None,
            src_route: None,
        },
    );
    let config = RoutesConfig {
        i18n: Some(I18n {
            locales: vec!["en".to_string(), "fr".to_string()],
            default_locale: "en".to_string(),
        }),
        ..Default::default()
    };

    let output = build(
        &options(),
        &FrameworkConfig::default(),
        &config,
        &raw_routes(),
        &prerender,
        &[],
    )
    .unwrap();

    let ssg = &output.page_manifest.pages.ssg;

    // The build tool's prefix is normalized away on the base entry, path
    // key and data route alike
    let base = &ssg.non_dynamic["/pricing"];
    assert_eq!(base.data_route, "/_next/data/b1/pricing.json");

    // Locale duplicates are then synthesized from the stripped entry, so
    // each data route carries exactly one locale segment
    let en = &ssg.non_dynamic["/en/pricing"];
    assert_eq!(en.data_route, "/_next/data/b1/en/pricing.json");
    let fr = &ssg.non_dynamic["/fr/pricing"];
    assert_eq!(fr.data_route, "/_next/data/b1/fr/pricing.json");
}

#[test]
fn test_locale_materialization_is_additive() {
    let config = RoutesConfig {
        i18n: Some(I18n {
            locales: vec!["en".to_string(), "fr".to_string(), "nl".to_string()],
            default_locale: "en".to_string(),
        }),
        ..Default::default()
    };

    let base = build(
        &options(),
        &FrameworkConfig::default(),
        &RoutesConfig::default(),
        &raw_routes(),
        &prerender(),
        &[],
    )
    .unwrap();
    let localized = build(
        &options(),
        &FrameworkConfig::default(),
        &config,
        &raw_routes(),
        &prerender(),
        &[],
    )
    .unwrap();

    // Every entry present before expansion remains, unprefixed, after it
    let before = &base.page_manifest.pages;
    let after = &localized.page_manifest.pages;
    for path in before.html.non_dynamic.keys() {
        assert!(after.html.non_dynamic.contains_key(path), "lost {}", path);
    }
    for route in before.ssr.dynamic.keys() {
        assert!(after.ssr.dynamic.contains_key(route), "lost {}", route);
    }
    for path in before.ssg.non_dynamic.keys() {
        assert!(after.ssg.non_dynamic.contains_key(path), "lost {}", path);
    }

    // Locale duplicates were synthesized with localized artifacts
    assert_eq!(
        after.html.non_dynamic.get("/fr/terms"),
        Some(&"pages/fr/terms.html".to_string())
    );
    assert_eq!(
        after.html.non_dynamic.get("/fr"),
        Some(&"pages/fr/index.html".to_string())
    );
    assert_eq!(
        after.ssg.non_dynamic.get("/fr/about").unwrap().data_route,
        "/_next/data/b1/fr/about.json"
    );
    assert!(after.ssr.dynamic.contains_key("/fr/users/[id]"));
    assert!(after.ssr.catch_all.contains_key("/nl/docs/[...slug]"));
}

#[test]
fn test_global_dynamic_list_is_sorted_by_specificity() {
    let output = build(
        &options(),
        &FrameworkConfig::default(),
        &RoutesConfig::default(),
        &raw_routes(),
        &prerender(),
        &[],
    )
    .unwrap();

    let dynamic: Vec<&str> = output
        .page_manifest
        .pages
        .dynamic
        .iter()
        .map(|d| d.route.as_str())
        .collect();

    let docs_id = dynamic.iter().position(|r| *r == "/docs/[id]").unwrap();
    let docs_slug = dynamic.iter().position(|r| *r == "/docs/[...slug]").unwrap();
    let help = dynamic.iter().position(|r| *r == "/help/[[...topic]]").unwrap();

    assert!(docs_id < docs_slug, "plain dynamic before catch-all");
    assert!(docs_slug < help, "static head `docs` before `help`");

    // The list covers every dynamic bucket
    assert_eq!(dynamic.len(), 6);
}

#[test]
fn test_public_files_mapping() {
    let output = build(
        &options(),
        &FrameworkConfig::default(),
        &RoutesConfig::default(),
        &raw_routes(),
        &PrerenderedRoutes::default(),
        &["favicon.ico".to_string(), "img/logo.svg".to_string()],
    )
    .unwrap();

    assert_eq!(
        output.page_manifest.public_files.get("/favicon.ico"),
        Some(&"favicon.ico".to_string())
    );
    assert_eq!(
        output.page_manifest.public_files.get("/img/logo.svg"),
        Some(&"img/logo.svg".to_string())
    );
}

#[test]
fn test_build_is_deterministic() {
    let a = build(
        &options(),
        &FrameworkConfig::default(),
        &RoutesConfig::default(),
        &raw_routes(),
        &prerender(),
        &["favicon.ico".to_string()],
    )
    .unwrap();
    let b = build(
        &options(),
        &FrameworkConfig::default(),
        &RoutesConfig::default(),
        &raw_routes(),
        &prerender(),
        &["favicon.ico".to_string()],
    )
    .unwrap();
    assert_eq!(a.page_manifest, b.page_manifest);
    assert_eq!(a.api_manifest, b.api_manifest);
    assert_eq!(a.asset_manifest, b.asset_manifest);
}

#[test]
fn test_manifests_round_trip_through_json() {
    let output = build(
        &options(),
        &FrameworkConfig::default(),
        &RoutesConfig {
            i18n: Some(I18n {
                locales: vec!["en".to_string(), "fr".to_string()],
                default_locale: "en".to_string(),
            }),
            ..Default::default()
        },
        &raw_routes(),
        &prerender(),
        &["favicon.ico".to_string()],
    )
    .unwrap();

    let json = serde_json::to_string(&output.page_manifest).unwrap();
    let back: caret_manifest::PageManifest = serde_json::from_str(&json).unwrap();
    assert_eq!(back, output.page_manifest);

    let json = serde_json::to_string(&output.api_manifest).unwrap();
    let back: caret_manifest::ApiManifest = serde_json::from_str(&json).unwrap();
    assert_eq!(back, output.api_manifest);
}

#[test]
fn test_routes_manifest_preserves_declaration_order() {
    let config = RoutesConfig {
        redirects: vec![
            RedirectDecl {
                source: "/old/:slug".to_string(),
                destination: "/first/:slug".to_string(),
                status_code: 308,
            },
            RedirectDecl {
                source: "/old/:slug".to_string(),
                destination: "/second/:slug".to_string(),
                status_code: 307,
            },
        ],
        ..Default::default()
    };
    let manifest = prepare_routes_manifest(&config).unwrap();
    assert_eq!(manifest.redirects[0].destination, "/first/:slug");
    assert_eq!(manifest.redirects[1].destination, "/second/:slug");
}
