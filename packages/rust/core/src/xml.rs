//! Sitemap protocol XML serialization.

use chrono::SecondsFormat;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use url::Url;

use sitekit_shared::{Result, SiteKitError, SitemapEntry};

/// Namespace of the `<urlset>` root element.
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

fn xml_err(e: impl std::fmt::Display) -> SiteKitError {
    SiteKitError::Serialization(format!("sitemap XML: {e}"))
}

/// Resolve a site-relative `path` under `base_url`, keeping any path the
/// base URL already has (`https://host/site` + `/about` is
/// `https://host/site/about`).
pub fn site_url(base_url: &Url, path: &str) -> Result<Url> {
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let dir = format!("{}/", base.path());
        base.set_path(&dir);
    }
    base.join(path.trim_start_matches('/')).map_err(|e| {
        SiteKitError::validation(format!("cannot join {path} onto {base_url}: {e}"))
    })
}

/// Absolute URL for a site-relative location.
pub fn absolute_location(base_url: &Url, entry: &SitemapEntry) -> Result<Url> {
    site_url(base_url, entry.location.as_str())
}

/// Render entries as a sitemap document.
///
/// `<loc>` values are absolute URLs built from `base_url`; `<lastmod>` is
/// written only for entries that carry a timestamp.
pub fn render_sitemap(entries: &[SitemapEntry], base_url: &Url) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_err)?;

    let mut urlset = BytesStart::new("urlset");
    urlset.push_attribute(("xmlns", SITEMAP_NAMESPACE));
    writer.write_event(Event::Start(urlset)).map_err(xml_err)?;

    for entry in entries {
        let loc = absolute_location(base_url, entry)?;

        writer
            .write_event(Event::Start(BytesStart::new("url")))
            .map_err(xml_err)?;
        writer
            .create_element("loc")
            .write_text_content(BytesText::new(loc.as_str()))
            .map_err(xml_err)?;
        if let Some(modified) = entry.last_modified {
            let stamp = modified.to_rfc3339_opts(SecondsFormat::Secs, true);
            writer
                .create_element("lastmod")
                .write_text_content(BytesText::new(&stamp))
                .map_err(xml_err)?;
        }
        writer
            .create_element("changefreq")
            .write_text_content(BytesText::new(entry.change_frequency.as_str()))
            .map_err(xml_err)?;
        let priority = format!("{:.1}", entry.priority);
        writer
            .create_element("priority")
            .write_text_content(BytesText::new(&priority))
            .map_err(xml_err)?;
        writer
            .write_event(Event::End(BytesEnd::new("url")))
            .map_err(xml_err)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("urlset")))
        .map_err(xml_err)?;

    let mut xml = String::from_utf8(writer.into_inner()).map_err(xml_err)?;
    xml.push('\n');
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use quick_xml::Reader;
    use sitekit_shared::{ChangeFrequency, RoutePath};

    fn entry(path: &str, last_modified: Option<DateTime<Utc>>) -> SitemapEntry {
        let location = RoutePath::parse(path).unwrap();
        let class = crate::rules::classify(&location);
        SitemapEntry {
            location,
            change_frequency: class.change_frequency,
            priority: class.priority,
            last_modified,
        }
    }

    fn base() -> Url {
        Url::parse("https://www.acme.dev").unwrap()
    }

    /// Collect the text of every element named `tag`, failing on bad XML.
    fn texts_of(xml: &str, tag: &str) -> Vec<String> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);
        let mut buf = Vec::new();
        let mut inside = false;
        let mut out = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => inside = e.local_name().as_ref() == tag.as_bytes(),
                Ok(Event::End(_)) => inside = false,
                Ok(Event::Text(e)) if inside => out.push(e.unescape().unwrap().into_owned()),
                Ok(Event::Eof) => break,
                Err(e) => panic!("invalid XML: {e}"),
                _ => {}
            }
            buf.clear();
        }
        out
    }

    #[test]
    fn document_shape() {
        let stamp = Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();
        let entries = [entry("/", Some(stamp)), entry("/blog/hello", Some(stamp))];
        let xml = render_sitemap(&entries, &base()).unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert_eq!(xml.matches("<urlset").count(), 1);
        assert!(xml.contains(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
        assert_eq!(xml.matches("<url>").count(), 2);

        assert_eq!(
            texts_of(&xml, "loc"),
            vec!["https://www.acme.dev/", "https://www.acme.dev/blog/hello"]
        );
        assert_eq!(texts_of(&xml, "changefreq"), vec!["daily", "monthly"]);
        assert_eq!(texts_of(&xml, "priority"), vec!["1.0", "0.7"]);
    }

    #[test]
    fn lastmod_values_parse_as_dates() {
        let stamp = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let entries = [entry("/about", Some(stamp)), entry("/contact", Some(stamp))];
        let xml = render_sitemap(&entries, &base()).unwrap();

        let lastmods = texts_of(&xml, "lastmod");
        assert_eq!(lastmods.len(), 2);
        for value in lastmods {
            let parsed = DateTime::parse_from_rfc3339(&value).expect("valid lastmod");
            assert_eq!(parsed, stamp);
        }
    }

    #[test]
    fn lastmod_omitted_without_timestamp() {
        let xml = render_sitemap(&[entry("/services", None)], &base()).unwrap();
        assert!(!xml.contains("<lastmod>"));
        assert_eq!(texts_of(&xml, "changefreq"), vec![ChangeFrequency::Weekly.as_str()]);
    }

    #[test]
    fn empty_sitemap_is_still_well_formed() {
        let xml = render_sitemap(&[], &base()).unwrap();
        assert_eq!(xml.matches("<urlset").count(), 1);
        assert!(texts_of(&xml, "loc").is_empty());
    }

    #[test]
    fn special_characters_are_escaped() {
        let xml = render_sitemap(&[entry("/search&sort", None)], &base()).unwrap();
        assert!(xml.contains("/search&amp;sort"));
        assert_eq!(texts_of(&xml, "loc"), vec!["https://www.acme.dev/search&sort"]);
    }

    #[test]
    fn base_url_path_is_kept() {
        let entries = [entry("/", None), entry("/about", None)];
        for base in ["https://www.acme.dev/site", "https://www.acme.dev/site/"] {
            let xml = render_sitemap(&entries, &Url::parse(base).unwrap()).unwrap();
            assert_eq!(
                texts_of(&xml, "loc"),
                vec!["https://www.acme.dev/site/", "https://www.acme.dev/site/about"]
            );
        }
    }
}
