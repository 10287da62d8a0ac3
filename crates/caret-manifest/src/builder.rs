//! Manifest builder
//!
//! Pure function of its inputs: the same build outputs always produce the
//! same manifests, supporting reproducible builds. No side effects beyond
//! the returned structures.
//!
//! Build order:
//! 1. Classify every raw route→file entry and dispatch it into buckets
//! 2. Merge prerendered (SSG) routes, normalizing build-tool quirks
//! 3. Materialize locale duplicates (additive, over immutable snapshots)
//! 4. Partition SSR dynamic routes into non-catch-all and catch-all
//! 5. Produce the globally sorted dynamic scan list
//! 6. Produce the API manifest's sorted dynamic list
//! 7. Map public files

use std::collections::BTreeMap;

use anyhow::{Context, Result};

use caret_routes::{has_catch_all, optional_catch_all_base, pattern_str, PatternError};

use crate::classify::{classify_page, PageClass, PageKind, RouteShape};
use crate::input::{BuildOptions, FrameworkConfig, PrerenderedRoutes, RoutesConfig};
use crate::locale::{materialize_locales, strip_default_locale, strip_default_locale_data_route};
use crate::manifest::{
    ApiManifest, ApiRoute, Apis, AssetManifest, DynamicRoute, DynamicStaticGenRoute, HeaderRule,
    HtmlPages, PageFile, PageManifest, Pages, RedirectRule, RewriteRule, RoutesManifest, SsgPages,
    SsrPages, StaticGenRoute,
};

/// The three manifests produced per deploy
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOutput {
    pub page_manifest: PageManifest,
    pub api_manifest: ApiManifest,
    pub asset_manifest: AssetManifest,
}

/// Intermediate buckets used while classifying
///
/// SSR dynamic routes stay in a single map (catch-alls included) until
/// the partition step, since locale materialization runs before it.
#[derive(Debug, Clone, Default)]
pub(crate) struct PageBuckets {
    pub html_non_dynamic: BTreeMap<String, String>,
    pub html_dynamic: BTreeMap<String, PageFile>,
    pub ssr_non_dynamic: BTreeMap<String, String>,
    pub ssr_dynamic: BTreeMap<String, PageFile>,
    pub ssg_non_dynamic: BTreeMap<String, StaticGenRoute>,
    pub ssg_dynamic: BTreeMap<String, DynamicStaticGenRoute>,
    pub api_non_dynamic: BTreeMap<String, String>,
    pub api_dynamic: BTreeMap<String, String>,
}

/// Builds the page, API and asset manifests from raw build outputs
///
/// # Arguments
///
/// * `options` - deploy options (build id, domain redirects, auth)
/// * `framework` - framework build config subset (trailing slash)
/// * `routes_config` - authored routing config (for i18n)
/// * `raw_routes` - flat route path → build artifact filename mapping
/// * `prerender` - prerender metadata from the build tool
/// * `public_files` - discovered static asset paths, relative
pub fn build(
    options: &BuildOptions,
    framework: &FrameworkConfig,
    routes_config: &RoutesConfig,
    raw_routes: &BTreeMap<String, String>,
    prerender: &PrerenderedRoutes,
    public_files: &[String],
) -> Result<BuildOutput> {
    let mut buckets = PageBuckets::default();

    // 1. Classification and dispatch
    for (route, file) in raw_routes {
        let class = classify_page(route, file);
        insert_classified(&mut buckets, route, file, class)
            .with_context(|| format!("classifying route `{}`", route))?;
    }

    // 2. SSG merge
    merge_prerendered(&mut buckets, prerender, routes_config, &options.build_id)?;

    // 3. Locale materialization
    if let Some(i18n) = &routes_config.i18n {
        buckets = materialize_locales(&buckets, i18n, &options.build_id)?;
    }

    // 4. SSR partition: catch-alls are tried strictly after all
    // more-specific dynamic routes
    let (ssr_dynamic, ssr_catch_all): (BTreeMap<_, _>, BTreeMap<_, _>) = buckets
        .ssr_dynamic
        .iter()
        .map(|(route, page)| (route.clone(), page.clone()))
        .partition(|(route, _)| !has_catch_all(route));

    // 5. Globally sorted dynamic scan list
    let dynamic = sorted_dynamic_routes(&buckets)?;

    // 6. API sorted dynamic list
    let api_dynamic = caret_routes::sort_routes(buckets.api_dynamic.keys().cloned())
        .into_iter()
        .map(|route| {
            let file = buckets.api_dynamic[&route].clone();
            let regex = pattern_str(&route)
                .with_context(|| format!("compiling API route `{}`", route))?;
            Ok(ApiRoute { file, regex })
        })
        .collect::<Result<Vec<_>>>()?;

    // 7. Public files
    let public_files = public_files
        .iter()
        .map(|rel| (format!("/{}", rel), rel.clone()))
        .collect();

    let domain_redirects = normalized_domain_redirects(&options.domain_redirects);

    let page_manifest = PageManifest {
        build_id: options.build_id.clone(),
        trailing_slash: framework.trailing_slash,
        domain_redirects: domain_redirects.clone(),
        authentication: options.authentication.clone(),
        pages: Pages {
            html: HtmlPages {
                non_dynamic: buckets.html_non_dynamic,
                dynamic: buckets.html_dynamic,
            },
            ssr: SsrPages {
                non_dynamic: buckets.ssr_non_dynamic,
                dynamic: ssr_dynamic,
                catch_all: ssr_catch_all,
            },
            ssg: SsgPages {
                non_dynamic: buckets.ssg_non_dynamic,
                dynamic: buckets.ssg_dynamic,
            },
            dynamic,
        },
        public_files,
    };

    let api_manifest = ApiManifest {
        apis: Apis {
            non_dynamic: buckets.api_non_dynamic,
            dynamic: api_dynamic,
        },
        domain_redirects: domain_redirects.clone(),
        authentication: options.authentication.clone(),
    };

    let asset_manifest = AssetManifest {
        domain_redirects,
        authentication: options.authentication.clone(),
    };

    Ok(BuildOutput {
        page_manifest,
        api_manifest,
        asset_manifest,
    })
}

/// Dispatches one classified entry into its bucket
///
/// Optional catch-all routes register BOTH the dynamic entry and a
/// companion non-dynamic base entry (catch-all segment stripped). The
/// base entry is only inserted into an unoccupied slot: an explicit
/// non-dynamic entry at the same path always wins.
fn insert_classified(
    buckets: &mut PageBuckets,
    route: &str,
    file: &str,
    class: PageClass,
) -> Result<(), PatternError> {
    let (non_dynamic, dynamic): (
        &mut BTreeMap<String, String>,
        Option<&mut BTreeMap<String, PageFile>>,
    ) = match class.kind {
        PageKind::Html => (&mut buckets.html_non_dynamic, Some(&mut buckets.html_dynamic)),
        PageKind::Ssr => (&mut buckets.ssr_non_dynamic, Some(&mut buckets.ssr_dynamic)),
        PageKind::Api => (&mut buckets.api_non_dynamic, None),
    };

    match class.shape {
        RouteShape::Static => {
            non_dynamic.insert(route.to_string(), file.to_string());
        }
        RouteShape::Dynamic => match dynamic {
            Some(dynamic) => {
                dynamic.insert(
                    route.to_string(),
                    PageFile {
                        file: file.to_string(),
                        regex: pattern_str(route)?,
                    },
                );
            }
            None => {
                buckets
                    .api_dynamic
                    .insert(route.to_string(), file.to_string());
            }
        },
        RouteShape::OptionalCatchAll => {
            if let Some(base) = optional_catch_all_base(route) {
                non_dynamic.entry(base).or_insert_with(|| file.to_string());
            }
            match dynamic {
                Some(dynamic) => {
                    dynamic.insert(
                        route.to_string(),
                        PageFile {
                            file: file.to_string(),
                            regex: pattern_str(route)?,
                        },
                    );
                }
                None => {
                    buckets
                        .api_dynamic
                        .insert(route.to_string(), file.to_string());
                }
            }
        }
    }
    Ok(())
}

/// Merges prerendered routes from build metadata into the SSG buckets
///
/// Non-dynamic entries first, normalizing away an accidentally
/// default-locale-prefixed path together with the matching prefix on the
/// entry's data route, then dynamic SSG templates. Regexes supplied by
/// the metadata are kept verbatim; missing ones are regenerated with the
/// pattern compiler.
fn merge_prerendered(
    buckets: &mut PageBuckets,
    prerender: &PrerenderedRoutes,
    routes_config: &RoutesConfig,
    build_id: &str,
) -> Result<()> {
    for (path, route) in &prerender.routes {
        let (path, route) = match &routes_config.i18n {
            Some(i18n) => (
                strip_default_locale(path, i18n),
                StaticGenRoute {
                    data_route: strip_default_locale_data_route(&route.data_route, i18n, build_id),
                    revalidate_seconds: route.revalidate_seconds,
                    src_route: route.src_route.clone(),
                },
            ),
            None => (path.clone(), route.clone()),
        };
        buckets.ssg_non_dynamic.insert(path, route);
    }

    for (route, ssg) in &prerender.dynamic_routes {
        let route_regex = match &ssg.route_regex {
            Some(regex) => regex.clone(),
            None => pattern_str(route)
                .with_context(|| format!("compiling prerendered route `{}`", route))?,
        };
        let data_route_regex = match &ssg.data_route_regex {
            Some(regex) => regex.clone(),
            None => data_route_pattern(&ssg.data_route)
                .with_context(|| format!("compiling data route `{}`", ssg.data_route))?,
        };
        buckets.ssg_dynamic.insert(
            route.clone(),
            DynamicStaticGenRoute {
                route_regex,
                data_route: ssg.data_route.clone(),
                data_route_regex,
                fallback: ssg.fallback.clone(),
            },
        );
    }

    Ok(())
}

/// Produces the globally sorted dynamic-route list across all buckets
///
/// A template living in more than one bucket (an SSR route that is also
/// prerendered) still yields a single scan entry.
fn sorted_dynamic_routes(buckets: &PageBuckets) -> Result<Vec<DynamicRoute>> {
    let routes = buckets
        .html_dynamic
        .keys()
        .chain(buckets.ssg_dynamic.keys())
        .chain(buckets.ssr_dynamic.keys())
        .cloned();

    let mut sorted = caret_routes::sort_routes(routes);
    sorted.dedup();

    sorted
        .into_iter()
        .map(|route| {
            let regex = if let Some(ssg) = buckets.ssg_dynamic.get(&route) {
                ssg.route_regex.clone()
            } else if let Some(page) = buckets.html_dynamic.get(&route) {
                page.regex.clone()
            } else if let Some(page) = buckets.ssr_dynamic.get(&route) {
                page.regex.clone()
            } else {
                pattern_str(&route)
                    .with_context(|| format!("compiling dynamic route `{}`", route))?
            };
            Ok(DynamicRoute { route, regex })
        })
        .collect()
}

/// Compiles a test-pattern for an SSG data route
///
/// Data routes end in a literal `.json` attached to the final (possibly
/// dynamic) segment, so the suffix is appended after template compilation
/// instead of being escaped as part of a static segment.
pub(crate) fn data_route_pattern(data_route: &str) -> Result<String, PatternError> {
    match data_route.strip_suffix(".json") {
        Some(stem) => pattern_str(stem).map(|p| p.replace("(?:/)?$", r"\.json(?:/)?$")),
        None => pattern_str(data_route),
    }
}

/// Normalizes the domain-redirect table
///
/// Hosts lose any scheme; target prefixes lose a trailing slash so the
/// request URI can be appended verbatim.
fn normalized_domain_redirects(
    domain_redirects: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    domain_redirects
        .iter()
        .map(|(host, target)| {
            let host = host
                .trim_start_matches("https://")
                .trim_start_matches("http://")
                .trim_end_matches('/')
                .to_string();
            (host, target.trim_end_matches('/').to_string())
        })
        .collect()
}

/// Prepares the routes manifest from the authored routing config
///
/// Each rule's source pattern is compiled to its stored test-regex
/// string, preserving declaration order. The configured base path is
/// prepended to rule sources and to internal destinations.
pub fn prepare_routes_manifest(routes_config: &RoutesConfig) -> Result<RoutesManifest> {
    let base_path = normalize_base_path(&routes_config.base_path);

    let redirects = routes_config
        .redirects
        .iter()
        .map(|decl| {
            let source = prefix_base(&base_path, &decl.source);
            let regex = pattern_str(&source)
                .with_context(|| format!("compiling redirect source `{}`", source))?;
            Ok(RedirectRule {
                destination: prefix_internal(&base_path, &decl.destination),
                status_code: decl.status_code,
                source,
                regex,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let rewrites = routes_config
        .rewrites
        .iter()
        .map(|decl| {
            let source = prefix_base(&base_path, &decl.source);
            let regex = pattern_str(&source)
                .with_context(|| format!("compiling rewrite source `{}`", source))?;
            Ok(RewriteRule {
                destination: prefix_internal(&base_path, &decl.destination),
                source,
                regex,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let headers = routes_config
        .headers
        .iter()
        .map(|decl| {
            let source = prefix_base(&base_path, &decl.source);
            let regex = pattern_str(&source)
                .with_context(|| format!("compiling header source `{}`", source))?;
            Ok(HeaderRule {
                headers: decl.headers.clone(),
                source,
                regex,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(RoutesManifest {
        base_path,
        redirects,
        rewrites,
        headers,
        i18n: routes_config.i18n.clone(),
    })
}

/// Canonical base path: empty, or leading slash with no trailing slash
fn normalize_base_path(base_path: &str) -> String {
    let trimmed = base_path.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

fn prefix_base(base_path: &str, path: &str) -> String {
    if base_path.is_empty() {
        path.to_string()
    } else if path == "/" {
        base_path.to_string()
    } else {
        format!("{}{}", base_path, path)
    }
}

/// Base path applies to internal destinations only; absolute URLs pass
/// through untouched
fn prefix_internal(base_path: &str, destination: &str) -> String {
    if destination.starts_with('/') {
        prefix_base(base_path, destination)
    } else {
        destination.to_string()
    }
}
