//! In-memory content source for offline builds and tests.

use sitekit_shared::{ContentSlug, FetchError, Result};

use crate::ContentSource;

/// A [`ContentSource`] backed by fixed slug lists or fixed failures.
#[derive(Debug, Clone)]
pub struct StaticSource {
    blog: std::result::Result<Vec<ContentSlug>, FetchError>,
    case_studies: std::result::Result<Vec<ContentSlug>, FetchError>,
}

impl StaticSource {
    /// A source with no published content.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn new(blog: Vec<ContentSlug>, case_studies: Vec<ContentSlug>) -> Self {
        Self {
            blog: Ok(blog),
            case_studies: Ok(case_studies),
        }
    }

    /// Build from raw strings, validating each slug.
    pub fn from_slugs(blog: &[&str], case_studies: &[&str]) -> Result<Self> {
        let parse = |raw: &[&str]| {
            raw.iter()
                .map(|s| ContentSlug::parse(s))
                .collect::<Result<Vec<_>>>()
        };
        Ok(Self::new(parse(blog)?, parse(case_studies)?))
    }

    /// A source whose every fetch fails with `message`.
    pub fn unavailable(message: &str) -> Self {
        let err = FetchError::Unreachable {
            url: "static://unavailable".into(),
            message: message.into(),
        };
        Self {
            blog: Err(err.clone()),
            case_studies: Err(err),
        }
    }

    /// Make blog fetches fail.
    pub fn with_blog_error(mut self, err: FetchError) -> Self {
        self.blog = Err(err);
        self
    }

    /// Make case-study fetches fail.
    pub fn with_case_study_error(mut self, err: FetchError) -> Self {
        self.case_studies = Err(err);
        self
    }
}

impl ContentSource for StaticSource {
    async fn blog_slugs(&self) -> std::result::Result<Vec<ContentSlug>, FetchError> {
        self.blog.clone()
    }

    async fn case_study_slugs(&self) -> std::result::Result<Vec<ContentSlug>, FetchError> {
        self.case_studies.clone()
    }
}
