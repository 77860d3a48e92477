//! Application configuration for SiteKit.
//!
//! Config is read from `./sitekit.toml`, falling back to
//! `~/.sitekit/sitekit.toml`, falling back to built-in defaults.
//! CLI flags override config file values.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, SiteKitError};
use crate::types::RoutePath;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "sitekit.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".sitekit";

/// Prefixes that never appear in a sitemap, whatever the config file says.
pub const MANDATORY_EXCLUDED_PREFIXES: [&str; 3] = ["/api/", "/studio", "/demo"];

// ---------------------------------------------------------------------------
// Config structs (matching sitekit.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Public site settings.
    #[serde(default)]
    pub site: SiteConfig,

    /// Sitemap generation settings.
    #[serde(default)]
    pub sitemap: SitemapConfig,

    /// Headless CMS connection.
    #[serde(default)]
    pub cms: CmsConfig,
}

/// `[site]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Canonical origin used for absolute `<loc>` and `Sitemap:` URLs.
    #[serde(default = "default_base_url")]
    pub base_url: Url,

    /// Directory the public artifacts are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_base_url() -> Url {
    Url::parse("https://example.com").expect("static default URL")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("public")
}

/// `[sitemap]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitemapConfig {
    /// Stamp every entry with the build time as `<lastmod>`.
    #[serde(default = "default_true")]
    pub auto_last_modified: bool,

    /// Routes that exist independently of CMS content.
    #[serde(default = "default_static_routes")]
    pub static_routes: Vec<RoutePath>,

    /// Additional path prefixes kept out of the sitemap.
    #[serde(default = "default_excluded_prefixes")]
    pub excluded_prefixes: Vec<String>,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            auto_last_modified: true,
            static_routes: default_static_routes(),
            excluded_prefixes: default_excluded_prefixes(),
        }
    }
}

impl SitemapConfig {
    /// Configured exclusions merged with [`MANDATORY_EXCLUDED_PREFIXES`].
    pub fn effective_excluded_prefixes(&self) -> Vec<String> {
        let mut prefixes: Vec<String> = MANDATORY_EXCLUDED_PREFIXES
            .iter()
            .map(|p| (*p).to_string())
            .collect();
        for prefix in &self.excluded_prefixes {
            if !prefixes.contains(prefix) {
                prefixes.push(prefix.clone());
            }
        }
        prefixes
    }
}

fn default_true() -> bool {
    true
}
fn default_static_routes() -> Vec<RoutePath> {
    ["/", "/about", "/services", "/contact", "/case-studies"]
        .into_iter()
        .filter_map(|p| RoutePath::parse(p).ok())
        .collect()
}
fn default_excluded_prefixes() -> Vec<String> {
    MANDATORY_EXCLUDED_PREFIXES
        .iter()
        .map(|p| (*p).to_string())
        .collect()
}

/// `[cms]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmsConfig {
    /// Content store project identifier.
    #[serde(default)]
    pub project_id: String,

    /// Dataset to query.
    #[serde(default = "default_dataset")]
    pub dataset: String,

    /// Query API version date.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Override for the query API origin (defaults to the project's API host).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_host: Option<Url>,

    /// Name of the env var holding an optional read token (never store the token itself).
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            dataset: default_dataset(),
            api_version: default_api_version(),
            api_host: None,
            token_env: default_token_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl CmsConfig {
    /// Origin of the query API: the override, or `https://{project_id}.api.sanity.io`.
    pub fn api_base_url(&self) -> Result<Url> {
        if let Some(host) = &self.api_host {
            return Ok(host.clone());
        }
        if self.project_id.is_empty() {
            return Err(SiteKitError::config(
                "cms.project_id is not set. Add it to sitekit.toml or pass --offline",
            ));
        }
        Url::parse(&format!("https://{}.api.sanity.io", self.project_id)).map_err(|e| {
            SiteKitError::config(format!("invalid cms.project_id {:?}: {e}", self.project_id))
        })
    }

    /// Read token from the configured env var, if set and non-empty.
    pub fn read_token(&self) -> Option<String> {
        std::env::var(&self.token_env)
            .ok()
            .filter(|token| !token.is_empty())
    }
}

fn default_dataset() -> String {
    "production".into()
}
fn default_api_version() -> String {
    "2024-01-01".into()
}
fn default_token_env() -> String {
    "SANITY_API_READ_TOKEN".into()
}
fn default_timeout_secs() -> u64 {
    10
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.sitekit/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| SiteKitError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the user config file (`~/.sitekit/sitekit.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load config from `./sitekit.toml`, then the user config file.
/// Returns defaults if neither exists.
pub fn load_config() -> Result<AppConfig> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return load_config_from(&local);
    }

    let path = config_file_path()?;
    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SiteKitError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content)
        .map_err(|e| SiteKitError::config(format!("failed to parse {}: {e}", path.display())))?;
    validate_site(&config)?;
    Ok(config)
}

/// Write a default config file to `path`, creating parent directories.
pub fn write_default_config(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| SiteKitError::io(dir, e))?;
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| SiteKitError::config(e.to_string()))?;
    std::fs::write(path, content).map_err(|e| SiteKitError::io(path, e))?;
    tracing::info!(?path, "created default config file");
    Ok(())
}

/// Create the user config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let path = config_file_path()?;
    write_default_config(&path)?;
    Ok(path)
}

/// Check that the base URL can be used to build absolute sitemap locations.
pub fn validate_site(config: &AppConfig) -> Result<()> {
    let url = &config.site.base_url;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(SiteKitError::config(format!(
            "site.base_url must be an absolute http(s) URL, got {url}"
        )));
    }
    Ok(())
}

/// Check that enough CMS settings are present to query the content store.
pub fn validate_cms(config: &AppConfig) -> Result<()> {
    config.cms.api_base_url()?;
    if config.cms.dataset.is_empty() {
        return Err(SiteKitError::config("cms.dataset must not be empty"));
    }
    Ok(())
}
