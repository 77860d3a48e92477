//! Cache policy table: content class → `Cache-Control` header value.
//!
//! The response layer reads these strings verbatim. Unknown classes fail
//! closed to [`FALLBACK_POLICY`] so a typo can never widen caching.

use std::sync::LazyLock;

use serde::Serialize;
use tracing::debug;

use sitekit_shared::{ContentType, Result, RoutePath, SiteKitError};

/// Served for any class the table does not know.
pub const FALLBACK_POLICY: &str = "no-cache";

/// Content classes with distinct caching behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentClass {
    /// Fingerprinted build output, fonts, images.
    StaticAssets,
    /// Pages rendered once per deploy.
    StaticPages,
    /// CMS-backed pages regenerated in the background.
    DynamicContent,
    ApiRoutes,
}

impl ContentClass {
    pub const ALL: [ContentClass; 4] = [
        Self::StaticAssets,
        Self::StaticPages,
        Self::DynamicContent,
        Self::ApiRoutes,
    ];

    /// Table key, e.g. `static-assets`.
    pub fn key(self) -> &'static str {
        match self {
            Self::StaticAssets => "static-assets",
            Self::StaticPages => "static-pages",
            Self::DynamicContent => "dynamic-content",
            Self::ApiRoutes => "api-routes",
        }
    }

    /// Look up a class by its table key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|class| class.key() == key)
    }
}

impl std::fmt::Display for ContentClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// One row of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CachePolicy {
    pub content_class: ContentClass,
    pub header: &'static str,
}

/// Immutable mapping from content class to header value.
#[derive(Debug, Clone)]
pub struct CachePolicyTable {
    policies: Vec<CachePolicy>,
}

impl CachePolicyTable {
    /// The site's caching policy.
    pub fn standard() -> Self {
        Self {
            policies: vec![
                CachePolicy {
                    content_class: ContentClass::StaticAssets,
                    header: "public, max-age=31536000, immutable",
                },
                CachePolicy {
                    content_class: ContentClass::StaticPages,
                    header: "public, max-age=3600, s-maxage=86400, stale-while-revalidate",
                },
                CachePolicy {
                    content_class: ContentClass::DynamicContent,
                    header: "public, max-age=0, s-maxage=60, stale-while-revalidate",
                },
                CachePolicy {
                    content_class: ContentClass::ApiRoutes,
                    header: "no-store",
                },
            ],
        }
    }

    /// Header value for a class key; unknown keys get [`FALLBACK_POLICY`].
    pub fn policy_for(&self, content_class: &str) -> &'static str {
        match ContentClass::from_key(content_class) {
            Some(class) => self.header(class),
            None => {
                debug!(content_class, "unknown content class, serving fallback policy");
                FALLBACK_POLICY
            }
        }
    }

    /// Header value for a known class.
    pub fn header(&self, class: ContentClass) -> &'static str {
        self.policies
            .iter()
            .find(|p| p.content_class == class)
            .map_or(FALLBACK_POLICY, |p| p.header)
    }

    /// All rows in table order.
    pub fn policies(&self) -> &[CachePolicy] {
        &self.policies
    }
}

impl Default for CachePolicyTable {
    fn default() -> Self {
        Self::standard()
    }
}

static STANDARD_POLICIES: LazyLock<CachePolicyTable> = LazyLock::new(CachePolicyTable::standard);

/// Header value for `content_class` from the standard table.
pub fn policy_for(content_class: &str) -> &'static str {
    STANDARD_POLICIES.policy_for(content_class)
}

// ---------------------------------------------------------------------------
// Route mapping and header manifest
// ---------------------------------------------------------------------------

/// Path prefixes served as static build assets.
const ASSET_PREFIXES: [&str; 3] = ["/_next/static/", "/images/", "/fonts/"];

/// Which class a request path belongs to.
pub fn class_for_route(path: &RoutePath) -> ContentClass {
    let p = path.as_str();
    if ASSET_PREFIXES.iter().any(|prefix| p.starts_with(prefix)) || p == "/favicon.ico" {
        return ContentClass::StaticAssets;
    }
    if p.starts_with("/api/") {
        return ContentClass::ApiRoutes;
    }
    let is_cms_page = [ContentType::BlogPost, ContentType::CaseStudy]
        .into_iter()
        .map(ContentType::path_prefix)
        .any(|prefix| {
            p == prefix || p.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('/'))
        });
    if is_cms_page {
        return ContentClass::DynamicContent;
    }
    ContentClass::StaticPages
}

#[derive(Debug, Serialize)]
struct HeaderPair {
    key: &'static str,
    value: &'static str,
}

#[derive(Debug, Serialize)]
struct RouteHeaders {
    source: String,
    headers: Vec<HeaderPair>,
}

/// Route patterns in the order the response layer must try them.
/// Later rules override earlier ones for overlapping sources.
fn manifest_routes() -> Vec<(String, ContentClass)> {
    let mut routes = vec![("/:path*".to_string(), ContentClass::StaticPages)];
    for kind in [ContentType::BlogPost, ContentType::CaseStudy] {
        let prefix = kind.path_prefix();
        routes.push((prefix.to_string(), ContentClass::DynamicContent));
        routes.push((format!("{prefix}/:slug*"), ContentClass::DynamicContent));
    }
    for prefix in ASSET_PREFIXES {
        routes.push((format!("{prefix}:path*"), ContentClass::StaticAssets));
    }
    routes.push(("/favicon.ico".to_string(), ContentClass::StaticAssets));
    routes.push(("/api/:path*".to_string(), ContentClass::ApiRoutes));
    routes
}

/// Render the table as a JSON route-header manifest:
/// `[{ "source": "/api/:path*", "headers": [{ "key": "Cache-Control", "value": "no-store" }] }, ...]`.
pub fn headers_manifest(table: &CachePolicyTable) -> Result<serde_json::Value> {
    let routes: Vec<RouteHeaders> = manifest_routes()
        .into_iter()
        .map(|(source, class)| RouteHeaders {
            source,
            headers: vec![HeaderPair {
                key: "Cache-Control",
                value: table.header(class),
            }],
        })
        .collect();
    serde_json::to_value(routes)
        .map_err(|e| SiteKitError::Serialization(format!("header manifest: {e}")))
}
