//! Manifest data model
//!
//! All manifests are plain serde structs with camelCase field names so the
//! persisted JSON matches the build tool's artifact format. Every path key
//! is stored with a leading slash and no trailing slash (root `/` exempt).
//! Manifests are constructed once at build time and treated as read-only
//! for the lifetime of the routing process.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ============================================================================
// Page Manifest
// ============================================================================

/// Deploy-wide page routing manifest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageManifest {
    /// Build identifier, used to construct data-route URLs
    pub build_id: String,
    /// Trailing-slash policy for page requests
    pub trailing_slash: bool,
    /// Exact request-host → target-prefix redirect table
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub domain_redirects: BTreeMap<String, String>,
    /// Optional HTTP Basic credentials gating the deployment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<Authentication>,
    pub pages: Pages,
    /// `/<relativePath>` → `<relativePath>` for every static asset
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub public_files: BTreeMap<String, String>,
}

/// Pages partitioned by rendering mode
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pages {
    pub html: HtmlPages,
    pub ssr: SsrPages,
    pub ssg: SsgPages,
    /// Globally sorted dynamic-route scan list across html + ssg + ssr
    /// buckets; the single ordered scan list used at request time
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dynamic: Vec<DynamicRoute>,
}

/// Fully static HTML artifacts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlPages {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub non_dynamic: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dynamic: BTreeMap<String, PageFile>,
}

/// Server-rendered pages
///
/// The `dynamic` bucket holds non-catch-all templates only; catch-alls
/// are partitioned into `catch_all` so they are tried strictly after all
/// more-specific dynamic routes regardless of sort order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SsrPages {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub non_dynamic: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dynamic: BTreeMap<String, PageFile>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub catch_all: BTreeMap<String, PageFile>,
}

/// Statically generated pages with optional revalidation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SsgPages {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub non_dynamic: BTreeMap<String, StaticGenRoute>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dynamic: BTreeMap<String, DynamicStaticGenRoute>,
}

/// A build artifact paired with the test-pattern of its route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFile {
    pub file: String,
    pub regex: String,
}

/// The Compiled Route pair: (route template, test-pattern source string)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicRoute {
    pub route: String,
    pub regex: String,
}

/// A prerendered non-dynamic route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticGenRoute {
    pub data_route: String,
    /// Seconds between revalidations; serialized as number | false
    #[serde(default, with = "revalidate")]
    pub revalidate_seconds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_route: Option<String>,
}

/// A prerendered dynamic route template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicStaticGenRoute {
    pub route_regex: String,
    pub data_route: String,
    pub data_route_regex: String,
    pub fallback: Fallback,
}

/// Fallback behavior of a dynamic SSG route
///
/// Serializes as string | false | null, matching the build tool's
/// prerender metadata format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// A fallback artifact is served while the page generates
    Page(String),
    /// Unknown paths are not generated on demand (`fallback: false`)
    Disabled,
    /// Rendering blocks until generation completes (`fallback: null`)
    Blocking,
}

impl Default for Fallback {
    fn default() -> Self {
        Fallback::Disabled
    }
}

impl Serialize for Fallback {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Fallback::Page(file) => serializer.serialize_str(file),
            Fallback::Disabled => serializer.serialize_bool(false),
            Fallback::Blocking => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for Fallback {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FallbackVisitor;

        impl<'de> Visitor<'de> for FallbackVisitor {
            type Value = Fallback;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a fallback artifact name, false, or null")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Fallback, E> {
                Ok(Fallback::Page(v.to_string()))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Fallback, E> {
                if v {
                    Err(E::invalid_value(de::Unexpected::Bool(true), &self))
                } else {
                    Ok(Fallback::Disabled)
                }
            }

            fn visit_unit<E: de::Error>(self) -> Result<Fallback, E> {
                Ok(Fallback::Blocking)
            }

            fn visit_none<E: de::Error>(self) -> Result<Fallback, E> {
                Ok(Fallback::Blocking)
            }
        }

        deserializer.deserialize_any(FallbackVisitor)
    }
}

/// Serde adapter: `Option<u32>` ↔ number | false
pub(crate) mod revalidate {
    use std::fmt;

    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(seconds) => serializer.serialize_u32(*seconds),
            None => serializer.serialize_bool(false),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<u32>, D::Error> {
        struct RevalidateVisitor;

        impl<'de> Visitor<'de> for RevalidateVisitor {
            type Value = Option<u32>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a revalidation period in seconds or false")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                if v {
                    Err(E::invalid_value(de::Unexpected::Bool(true), &self))
                } else {
                    Ok(None)
                }
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(Some(v as u32))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(Some(v as u32))
            }
        }

        deserializer.deserialize_any(RevalidateVisitor)
    }
}

// ============================================================================
// API Manifest
// ============================================================================

/// Deploy-wide API routing manifest, parallel to [`PageManifest`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiManifest {
    pub apis: Apis,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub domain_redirects: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<Authentication>,
}

/// API routes partitioned by dynamic-ness
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Apis {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub non_dynamic: BTreeMap<String, String>,
    /// Sorted by route specificity
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dynamic: Vec<ApiRoute>,
}

/// An API handler paired with its route's test-pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRoute {
    pub file: String,
    pub regex: String,
}

// ============================================================================
// Asset Manifest
// ============================================================================

/// Shared config consumed by the non-HTML asset handler
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetManifest {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub domain_redirects: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<Authentication>,
}

// ============================================================================
// Routes Manifest
// ============================================================================

/// Redirect, rewrite and header rules plus i18n configuration
///
/// Rule order is declaration order and is significant: the first matching
/// source wins, with no specificity re-ordering applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutesManifest {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub base_path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub redirects: Vec<RedirectRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rewrites: Vec<RewriteRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<HeaderRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub i18n: Option<I18n>,
}

/// An ordered redirect rule with its precompiled test-pattern source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectRule {
    pub source: String,
    pub destination: String,
    pub status_code: u16,
    pub regex: String,
}

/// An ordered rewrite rule, structurally identical to a redirect minus
/// the status code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteRule {
    pub source: String,
    pub destination: String,
    pub regex: String,
}

/// Response headers attached to every request matching `source`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderRule {
    pub source: String,
    pub headers: Vec<Header>,
    pub regex: String,
}

/// A single response header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    pub key: String,
    pub value: String,
}

/// Internationalization configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct I18n {
    pub locales: Vec<String>,
    pub default_locale: String,
}

/// HTTP Basic credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authentication {
    pub username: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_serialization() {
        assert_eq!(
            serde_json::to_string(&Fallback::Page("f.html".to_string())).unwrap(),
            r#""f.html""#
        );
        assert_eq!(serde_json::to_string(&Fallback::Disabled).unwrap(), "false");
        assert_eq!(serde_json::to_string(&Fallback::Blocking).unwrap(), "null");
    }

    #[test]
    fn test_fallback_deserialization() {
        let page: Fallback = serde_json::from_str(r#""f.html""#).unwrap();
        assert_eq!(page, Fallback::Page("f.html".to_string()));
        let disabled: Fallback = serde_json::from_str("false").unwrap();
        assert_eq!(disabled, Fallback::Disabled);
        let blocking: Fallback = serde_json::from_str("null").unwrap();
        assert_eq!(blocking, Fallback::Blocking);
        assert!(serde_json::from_str::<Fallback>("true").is_err());
    }

    #[test]
    fn test_revalidate_serialization() {
        let route = StaticGenRoute {
            data_route: "/_next/data/b/about.json".to_string(),
            revalidate_seconds: Some(60),
            src_route: None,
        };
        let json = serde_json::to_string(&route).unwrap();
        assert!(json.contains(r#""revalidateSeconds":60"#), "{}", json);

        let route = StaticGenRoute {
            revalidate_seconds: None,
            ..route
        };
        let json = serde_json::to_string(&route).unwrap();
        assert!(json.contains(r#""revalidateSeconds":false"#), "{}", json);

        let back: StaticGenRoute = serde_json::from_str(&json).unwrap();
        assert_eq!(back.revalidate_seconds, None);
    }

    #[test]
    fn test_page_manifest_round_trips_through_json() {
        let mut manifest = PageManifest {
            build_id: "build-1".to_string(),
            trailing_slash: false,
            ..Default::default()
        };
        manifest
            .pages
            .html
            .non_dynamic
            .insert("/terms".to_string(), "pages/terms.html".to_string());
        manifest.pages.dynamic.push(DynamicRoute {
            route: "/users/:id".to_string(),
            regex: r"^/users/([^/]+?)(?:/)?$".to_string(),
        });

        let json = serde_json::to_string(&manifest).unwrap();
        assert!(json.contains(r#""buildId":"build-1""#), "{}", json);
        assert!(json.contains(r#""nonDynamic""#), "{}", json);

        let back: PageManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, manifest);
    }
}
