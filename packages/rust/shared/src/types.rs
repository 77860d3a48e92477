//! Core domain types for sitemap and cache-policy generation.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SiteKitError};

// ---------------------------------------------------------------------------
// RoutePath
// ---------------------------------------------------------------------------

/// A validated site-relative URL path such as `/blog/my-post`.
///
/// Always starts with `/`, never carries a query or fragment, and has no
/// trailing slash except for the root path itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoutePath(String);

impl RoutePath {
    /// The site root, `/`.
    pub fn root() -> Self {
        Self("/".into())
    }

    /// Validate and normalize a raw path.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(SiteKitError::validation("route path is empty"));
        }
        if !raw.starts_with('/') {
            return Err(SiteKitError::validation(format!(
                "route path must start with '/': {raw:?}"
            )));
        }
        if raw.chars().any(|c| c.is_whitespace() || c == '?' || c == '#') {
            return Err(SiteKitError::validation(format!(
                "route path contains whitespace, query or fragment: {raw:?}"
            )));
        }

        let trimmed = raw.trim_end_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Listing page of a content type, e.g. `/blog`.
    pub fn for_listing(kind: ContentType) -> Self {
        Self(kind.path_prefix().to_string())
    }

    /// Build the detail-page path for a slug, e.g. `/blog/{slug}`.
    pub fn for_slug(kind: ContentType, slug: &ContentSlug) -> Self {
        Self(format!("{}/{}", kind.path_prefix(), slug.as_str()))
    }

    /// The path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoutePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for RoutePath {
    type Err = SiteKitError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RoutePath {
    type Error = SiteKitError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<RoutePath> for String {
    fn from(path: RoutePath) -> Self {
        path.0
    }
}

// ---------------------------------------------------------------------------
// ChangeFrequency
// ---------------------------------------------------------------------------

/// The `<changefreq>` values allowed by the sitemap protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    /// Every protocol value, most to least frequent.
    pub const ALL: [ChangeFrequency; 7] = [
        Self::Always,
        Self::Hourly,
        Self::Daily,
        Self::Weekly,
        Self::Monthly,
        Self::Yearly,
        Self::Never,
    ];

    /// Wire form as written into `<changefreq>`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl std::fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChangeFrequency {
    type Err = SiteKitError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|freq| freq.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| SiteKitError::validation(format!("invalid changefreq value: {s}")))
    }
}

// ---------------------------------------------------------------------------
// ContentType / ContentSlug
// ---------------------------------------------------------------------------

/// Kinds of CMS documents that get their own detail pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    BlogPost,
    CaseStudy,
}

impl ContentType {
    /// Document `_type` name in the content store.
    pub fn document_type(self) -> &'static str {
        match self {
            Self::BlogPost => "post",
            Self::CaseStudy => "caseStudy",
        }
    }

    /// Public listing path; detail pages live underneath it.
    pub fn path_prefix(self) -> &'static str {
        match self {
            Self::BlogPost => "/blog",
            Self::CaseStudy => "/case-studies",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlogPost => f.write_str("blog post"),
            Self::CaseStudy => f.write_str("case study"),
        }
    }
}

/// URL-safe slug characters: unreserved set, no leading punctuation.
static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._~-]*$").expect("slug regex"));

/// Identifier of a published content item, assigned by the content store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentSlug(String);

impl ContentSlug {
    /// Accept a slug only if it can be used verbatim as one path segment.
    pub fn parse(raw: &str) -> Result<Self> {
        if SLUG_RE.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(SiteKitError::validation(format!("invalid slug: {raw:?}")))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentSlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// SitemapEntry
// ---------------------------------------------------------------------------

/// One `<url>` element of the generated sitemap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitemapEntry {
    /// Site-relative location, unique within one sitemap.
    pub location: RoutePath,
    /// Crawl hint derived from the location.
    pub change_frequency: ChangeFrequency,
    /// Relative priority in `[0.0, 1.0]`, derived from the location.
    pub priority: f32,
    /// Build timestamp, present only when auto-timestamping is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_path_normalizes_trailing_slash() {
        assert_eq!(RoutePath::parse("/about/").unwrap().as_str(), "/about");
        assert_eq!(RoutePath::parse("/").unwrap(), RoutePath::root());
        assert_eq!(RoutePath::parse("//").unwrap(), RoutePath::root());
    }

    #[test]
    fn route_path_rejects_malformed_input() {
        assert!(RoutePath::parse("").is_err());
        assert!(RoutePath::parse("about").is_err());
        assert!(RoutePath::parse("/about us").is_err());
        assert!(RoutePath::parse("/blog?page=2").is_err());
        assert!(RoutePath::parse("/contact#form").is_err());
    }

    #[test]
    fn route_path_for_slug() {
        let slug = ContentSlug::parse("launch-week").unwrap();
        let path = RoutePath::for_slug(ContentType::CaseStudy, &slug);
        assert_eq!(path.as_str(), "/case-studies/launch-week");
    }

    #[test]
    fn route_path_deserialize_validates() {
        let ok: RoutePath = serde_json::from_str("\"/services/\"").unwrap();
        assert_eq!(ok.as_str(), "/services");
        assert!(serde_json::from_str::<RoutePath>("\"services\"").is_err());
    }

    #[test]
    fn change_frequency_parses_all_values() {
        for freq in ChangeFrequency::ALL {
            let parsed: ChangeFrequency = freq.as_str().parse().unwrap();
            assert_eq!(parsed, freq);
        }
        assert_eq!("WEEKLY".parse::<ChangeFrequency>().unwrap(), ChangeFrequency::Weekly);
        assert!("fortnightly".parse::<ChangeFrequency>().is_err());
    }

    #[test]
    fn slug_validation() {
        assert!(ContentSlug::parse("my-first-post").is_ok());
        assert!(ContentSlug::parse("v1.2_release~notes").is_ok());
        assert!(ContentSlug::parse("").is_err());
        assert!(ContentSlug::parse("-leading-dash").is_err());
        assert!(ContentSlug::parse("nested/slug").is_err());
        assert!(ContentSlug::parse("has space").is_err());
    }

    #[test]
    fn sitemap_entry_omits_missing_lastmod() {
        let entry = SitemapEntry {
            location: RoutePath::root(),
            change_frequency: ChangeFrequency::Daily,
            priority: 1.0,
            last_modified: None,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"location\":\"/\""));
        assert!(json.contains("\"change_frequency\":\"daily\""));
        assert!(!json.contains("last_modified"));
    }
}
