//! Writing generated artifacts into the public output directory.

use std::path::{Path, PathBuf};

use tracing::info;

use sitekit_shared::{Result, SiteKitError};

/// File name of the generated sitemap.
pub const SITEMAP_FILE: &str = "sitemap.xml";

/// File name of the generated robots file.
pub const ROBOTS_FILE: &str = "robots.txt";

/// Write `contents` to `{output_dir}/{file_name}`, creating the directory.
/// Returns the written path.
pub fn write_artifact(output_dir: &Path, file_name: &str, contents: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir).map_err(|e| SiteKitError::io(output_dir, e))?;

    let path = output_dir.join(file_name);
    std::fs::write(&path, contents).map_err(|e| SiteKitError::io(&path, e))?;
    info!(path = %path.display(), bytes = contents.len(), "artifact written");
    Ok(path)
}

/// Write `sitemap.xml` into `output_dir`.
pub fn publish_sitemap(output_dir: &Path, xml: &str) -> Result<PathBuf> {
    write_artifact(output_dir, SITEMAP_FILE, xml)
}

/// Write `robots.txt` into `output_dir`.
pub fn publish_robots(output_dir: &Path, robots: &str) -> Result<PathBuf> {
    write_artifact(output_dir, ROBOTS_FILE, robots)
}
