//! `robots.txt` generation.

use std::fmt::Write as _;

use url::Url;

use sitekit_shared::Result;

use crate::publish::SITEMAP_FILE;
use crate::xml::site_url;

/// Render `robots.txt`: allow everything except the excluded prefixes and
/// point crawlers at the sitemap.
pub fn render_robots<S: AsRef<str>>(base_url: &Url, excluded_prefixes: &[S]) -> Result<String> {
    let sitemap_url = site_url(base_url, SITEMAP_FILE)?;

    let mut out = String::from("User-agent: *\nAllow: /\n");
    for prefix in excluded_prefixes {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "Disallow: {}", prefix.as_ref());
    }
    let _ = write!(out, "\nSitemap: {sitemap_url}\n");
    Ok(out)
}
