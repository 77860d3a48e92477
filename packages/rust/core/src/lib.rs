//! Sitemap, robots and cache-policy generation for SiteKit.
//!
//! This crate ties the content source, the URL rule table, and the output
//! writers together into the artifacts the site publishes.

pub mod cache;
pub mod publish;
pub mod robots;
pub mod rules;
pub mod sitemap;
pub mod xml;

pub use cache::{CachePolicy, CachePolicyTable, ContentClass, FALLBACK_POLICY, policy_for};
pub use rules::{Classification, RuleTable, classify, is_excluded, standard_rules};
pub use sitemap::{SitemapAssembler, SitemapBuild, SitemapOptions};
pub use xml::{SITEMAP_NAMESPACE, render_sitemap};

#[cfg(test)]
mod tests {
    use super::*;
    use sitekit_cms::{SanityClient, StaticSource};
    use sitekit_shared::CmsConfig;
    use url::Url;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn base() -> Url {
        Url::parse("https://www.acme.dev").unwrap()
    }

    #[tokio::test]
    async fn end_to_end_against_mock_cms() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("$type", "\"post\""))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"result":["launch-notes"]}"#),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(query_param("$type", "\"caseStudy\""))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let config = CmsConfig {
            project_id: "test".into(),
            api_host: Some(Url::parse(&server.uri()).unwrap()),
            ..CmsConfig::default()
        };
        let client = SanityClient::new(&config).unwrap();
        let build = SitemapAssembler::new(&client, SitemapOptions::default())
            .build_report()
            .await;

        assert_eq!(build.skipped.len(), 1);
        let xml = render_sitemap(&build.entries, &base()).unwrap();
        assert!(xml.contains("<loc>https://www.acme.dev/blog/launch-notes</loc>"));
        assert!(!xml.contains("/case-studies/"));
        assert_eq!(xml.matches("<url>").count(), 7);
    }

    #[tokio::test]
    async fn unreachable_cms_still_publishes_static_sitemap() {
        let source = StaticSource::unavailable("dns failure");
        let entries = SitemapAssembler::new(&source, SitemapOptions::default())
            .build()
            .await;
        let xml = render_sitemap(&entries, &base()).unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        for path in ["/", "/about", "/services", "/contact", "/case-studies", "/blog"] {
            let loc = base().join(path).unwrap();
            assert!(xml.contains(&format!("<loc>{loc}</loc>")), "missing {loc}");
        }
        for excluded in ["/api/", "/studio", "/demo"] {
            assert!(!xml.contains(&format!("https://www.acme.dev{excluded}")));
        }
    }
}
