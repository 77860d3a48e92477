//! Sitemap assembly: static routes + CMS slugs → classified entries.

use std::collections::HashSet;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use sitekit_cms::ContentSource;
use sitekit_shared::{
    ContentSlug, ContentType, FetchError, RoutePath, SitemapConfig, SitemapEntry,
};

use crate::rules::{self, RuleTable};

/// Inputs to one sitemap build.
#[derive(Debug, Clone)]
pub struct SitemapOptions {
    /// Routes that exist independently of CMS content.
    pub static_routes: Vec<RoutePath>,
    /// Path prefixes that never appear in the output.
    pub excluded_prefixes: Vec<String>,
    /// Stamp every entry with the build time.
    pub auto_last_modified: bool,
}

impl From<&SitemapConfig> for SitemapOptions {
    fn from(config: &SitemapConfig) -> Self {
        Self {
            static_routes: config.static_routes.clone(),
            excluded_prefixes: config.effective_excluded_prefixes(),
            auto_last_modified: config.auto_last_modified,
        }
    }
}

impl Default for SitemapOptions {
    fn default() -> Self {
        Self::from(&SitemapConfig::default())
    }
}

/// Outcome of a build, including what had to be left out.
#[derive(Debug, Clone)]
pub struct SitemapBuild {
    /// Entries in emission order, unique by location.
    pub entries: Vec<SitemapEntry>,
    /// Content types whose slugs could not be fetched.
    pub skipped: Vec<(ContentType, FetchError)>,
    /// Number of candidate paths dropped by an excluded prefix.
    pub excluded: usize,
}

impl SitemapBuild {
    /// Whether every content source answered.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Builds sitemap entries from static routes and a [`ContentSource`].
pub struct SitemapAssembler<'a, S> {
    source: &'a S,
    options: SitemapOptions,
    rules: &'static RuleTable,
}

impl<'a, S: ContentSource> SitemapAssembler<'a, S> {
    pub fn new(source: &'a S, options: SitemapOptions) -> Self {
        Self {
            source,
            options,
            rules: rules::standard_rules(),
        }
    }

    /// Build the sitemap entries.
    ///
    /// Never fails: a content type whose fetch fails contributes no entries.
    pub async fn build(&self) -> Vec<SitemapEntry> {
        self.build_report().await.entries
    }

    /// Build the sitemap and report which sources were skipped.
    ///
    /// Order of the result: static routes, the blog listing, blog posts,
    /// case studies. Both slug fetches run concurrently and both finish
    /// before any entry is produced.
    #[instrument(skip_all, fields(static_routes = self.options.static_routes.len()))]
    pub async fn build_report(&self) -> SitemapBuild {
        let mut paths = self.options.static_routes.clone();
        paths.push(RoutePath::for_listing(ContentType::BlogPost));

        let (blog, case_studies) = tokio::join!(
            self.source.blog_slugs(),
            self.source.case_study_slugs(),
        );

        let mut skipped = Vec::new();
        for (kind, fetched) in [
            (ContentType::BlogPost, blog),
            (ContentType::CaseStudy, case_studies),
        ] {
            match fetched {
                Ok(slugs) => {
                    debug!(%kind, count = slugs.len(), "adding content pages");
                    paths.extend(slug_paths(kind, &slugs));
                }
                Err(e) => {
                    warn!(%kind, error = %e, "slug fetch failed, continuing without these pages");
                    skipped.push((kind, e));
                }
            }
        }

        let last_modified = self.options.auto_last_modified.then(Utc::now);
        let mut seen = HashSet::with_capacity(paths.len());
        let mut entries = Vec::with_capacity(paths.len());
        let mut excluded = 0;

        for path in paths {
            if rules::is_excluded(&path, &self.options.excluded_prefixes) {
                debug!(%path, "excluded from sitemap");
                excluded += 1;
                continue;
            }
            if !seen.insert(path.clone()) {
                continue;
            }

            let class = self.rules.classify(&path);
            entries.push(SitemapEntry {
                location: path,
                change_frequency: class.change_frequency,
                priority: class.priority,
                last_modified,
            });
        }

        info!(
            entries = entries.len(),
            excluded,
            skipped = skipped.len(),
            "sitemap assembled"
        );

        SitemapBuild {
            entries,
            skipped,
            excluded,
        }
    }
}

fn slug_paths(kind: ContentType, slugs: &[ContentSlug]) -> impl Iterator<Item = RoutePath> + '_ {
    slugs.iter().map(move |slug| RoutePath::for_slug(kind, slug))
}
