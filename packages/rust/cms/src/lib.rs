//! Content source adapter: lists published slugs from the headless CMS.
//!
//! The sitemap only needs two things from the content store: the slugs of
//! published blog posts and of published case studies. [`ContentSource`]
//! captures exactly that, so sitemap assembly can run against the live
//! [`SanityClient`] or an in-memory [`StaticSource`].

mod response;
mod static_source;

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use sitekit_shared::{CmsConfig, ContentSlug, ContentType, FetchError, Result, SiteKitError};
use tracing::{debug, instrument};
use url::Url;

pub use static_source::StaticSource;

/// User-Agent string for content store requests.
const USER_AGENT: &str = concat!("SiteKit/", env!("CARGO_PKG_VERSION"));

/// Published documents of one `_type` that have a slug, newest first.
/// Draft documents live under the `drafts.` id prefix and are skipped.
const SLUG_QUERY: &str = r#"*[_type == $type && defined(slug.current) && !(_id in path("drafts.**"))] | order(_createdAt desc).slug.current"#;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Read-only view of the content store used by sitemap assembly.
///
/// Each method yields the complete ordered slug list or a [`FetchError`],
/// never a partial list.
pub trait ContentSource {
    /// Slugs of published blog posts.
    fn blog_slugs(&self) -> impl Future<Output = std::result::Result<Vec<ContentSlug>, FetchError>> + Send;

    /// Slugs of published case studies.
    fn case_study_slugs(
        &self,
    ) -> impl Future<Output = std::result::Result<Vec<ContentSlug>, FetchError>> + Send;
}

// ---------------------------------------------------------------------------
// SanityClient
// ---------------------------------------------------------------------------

/// HTTP client for the CMS query API.
#[derive(Debug, Clone)]
pub struct SanityClient {
    client: Client,
    query_url: Url,
    token: Option<String>,
}

impl SanityClient {
    /// Build a client from the `[cms]` config section.
    pub fn new(config: &CmsConfig) -> Result<Self> {
        let base = config.api_base_url()?;
        let query_url = base
            .join(&format!(
                "v{}/data/query/{}",
                config.api_version.trim_start_matches('v'),
                config.dataset
            ))
            .map_err(|e| SiteKitError::config(format!("invalid CMS query URL: {e}")))?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SiteKitError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            query_url,
            token: config.read_token(),
        })
    }

    /// The endpoint queries are sent to.
    pub fn query_url(&self) -> &Url {
        &self.query_url
    }

    /// List the published slugs of one content type.
    #[instrument(skip(self), fields(url = %self.query_url))]
    pub async fn fetch_slugs(
        &self,
        kind: ContentType,
    ) -> std::result::Result<Vec<ContentSlug>, FetchError> {
        let type_param = format!("\"{}\"", kind.document_type());
        let mut request = self
            .client
            .get(self.query_url.clone())
            .query(&[("query", SLUG_QUERY), ("$type", type_param.as_str())]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| FetchError::Unreachable {
            url: self.query_url.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: self.query_url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| FetchError::Unreachable {
            url: self.query_url.to_string(),
            message: format!("failed to read body: {e}"),
        })?;

        let slugs = response::parse_slug_result(&body)?;
        debug!(%kind, count = slugs.len(), "fetched slugs");
        Ok(slugs)
    }
}

impl ContentSource for SanityClient {
    async fn blog_slugs(&self) -> std::result::Result<Vec<ContentSlug>, FetchError> {
        self.fetch_slugs(ContentType::BlogPost).await
    }

    async fn case_study_slugs(&self) -> std::result::Result<Vec<ContentSlug>, FetchError> {
        self.fetch_slugs(ContentType::CaseStudy).await
    }
}
