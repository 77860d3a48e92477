//! Shared types, error model, and configuration for SiteKit.
//!
//! This crate is the foundation depended on by all other SiteKit crates.
//! It provides:
//! - [`SiteKitError`] and [`FetchError`], the error taxonomy
//! - Domain types ([`RoutePath`], [`ContentSlug`], [`SitemapEntry`], ...)
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CmsConfig, MANDATORY_EXCLUDED_PREFIXES, SiteConfig, SitemapConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from, validate_cms, validate_site,
    write_default_config,
};
pub use error::{FetchError, Result, SiteKitError};
pub use types::{ChangeFrequency, ContentSlug, ContentType, RoutePath, SitemapEntry};
