//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use sitekit_cms::{ContentSource, SanityClient, StaticSource};
use sitekit_core::cache::{self, CachePolicyTable, ContentClass};
use sitekit_core::{SitemapAssembler, SitemapOptions, publish, render_sitemap, robots, rules};
use sitekit_shared::{
    AppConfig, RoutePath, init_config, load_config, load_config_from, validate_cms,
    write_default_config,
};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// SiteKit: sitemap, robots and cache policy for the marketing site.
#[derive(Parser)]
#[command(
    name = "sitekit",
    version,
    about = "Generate sitemap.xml and robots.txt from site routes and CMS content.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file (defaults to ./sitekit.toml, then ~/.sitekit/sitekit.toml).
    #[arg(long, global = true, env = "SITEKIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Build sitemap.xml from static routes and published CMS content.
    Sitemap {
        /// Output directory (defaults to site.output_dir).
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Omit <lastmod> even if the config enables it.
        #[arg(long)]
        no_lastmod: bool,

        /// Skip the CMS and emit static routes only.
        #[arg(long)]
        offline: bool,

        /// Refuse to write the sitemap if any CMS fetch failed.
        #[arg(long)]
        strict: bool,
    },

    /// Write robots.txt.
    Robots {
        /// Output directory (defaults to site.output_dir).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Show the sitemap priority and change frequency for paths.
    Classify {
        /// Site-relative paths, e.g. /blog/my-post.
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Print the Cache-Control header for a content class, or the whole table.
    CachePolicy {
        /// Content class key (static-assets, static-pages, dynamic-content, api-routes).
        class: Option<String>,
    },

    /// Print the route → Cache-Control header manifest as JSON.
    Headers,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a config file with defaults.
    Init {
        /// Write to this path instead of ~/.sitekit/sitekit.toml.
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Default filter directives for a `-v` count.
fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "sitekit=info,sitekit_core=info,sitekit_cms=warn,sitekit_shared=info",
        1 => "sitekit=debug,sitekit_core=debug,sitekit_cms=debug,sitekit_shared=debug",
        _ => "trace",
    }
}

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = default_filter(cli.verbose);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Sitemap {
            out,
            no_lastmod,
            offline,
            strict,
        } => {
            let config = resolve_config(config_path)?;
            cmd_sitemap(&config, out.as_deref(), no_lastmod, offline, strict).await
        }
        Command::Robots { out } => {
            let config = resolve_config(config_path)?;
            cmd_robots(&config, out.as_deref())
        }
        Command::Classify { paths } => cmd_classify(&paths),
        Command::CachePolicy { class } => cmd_cache_policy(class.as_deref()),
        Command::Headers => cmd_headers(),
        Command::Config { action } => match action {
            ConfigAction::Init { path } => cmd_config_init(path.as_deref()),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_sitemap(
    config: &AppConfig,
    out: Option<&Path>,
    no_lastmod: bool,
    offline: bool,
    strict: bool,
) -> Result<()> {
    let mut options = SitemapOptions::from(&config.sitemap);
    if no_lastmod {
        options.auto_last_modified = false;
    }
    let output_dir = out.unwrap_or(config.site.output_dir.as_path());

    if offline {
        info!("offline build, CMS content skipped");
        let source = StaticSource::empty();
        return write_sitemap(config, &source, options, output_dir, strict).await;
    }

    validate_cms(config)?;
    let client = SanityClient::new(&config.cms)?;
    info!(endpoint = %client.query_url(), "building sitemap");
    write_sitemap(config, &client, options, output_dir, strict).await
}

async fn write_sitemap<S: ContentSource>(
    config: &AppConfig,
    source: &S,
    options: SitemapOptions,
    output_dir: &Path,
    strict: bool,
) -> Result<()> {
    let spinner = Spinner::new("Fetching published content");
    let build = SitemapAssembler::new(source, options).build_report().await;
    spinner.finish();

    if strict && !build.is_complete() {
        return Err(eyre!(
            "{} content source(s) failed; refusing to publish an incomplete sitemap (--strict)",
            build.skipped.len()
        ));
    }

    let xml = render_sitemap(&build.entries, &config.site.base_url)?;
    let path = publish::publish_sitemap(output_dir, &xml)?;

    println!();
    println!("  Sitemap written!");
    println!("  Path:     {}", path.display());
    println!("  Entries:  {}", build.entries.len());
    println!("  Excluded: {}", build.excluded);
    for (kind, error) in &build.skipped {
        println!("  Skipped:  {kind} pages ({error})");
    }
    println!();

    Ok(())
}

fn cmd_robots(config: &AppConfig, out: Option<&Path>) -> Result<()> {
    let prefixes = config.sitemap.effective_excluded_prefixes();
    let body = robots::render_robots(&config.site.base_url, &prefixes)?;
    let output_dir = out.unwrap_or(config.site.output_dir.as_path());
    let path = publish::publish_robots(output_dir, &body)?;
    println!("robots.txt written to {}", path.display());
    Ok(())
}

fn cmd_classify(paths: &[String]) -> Result<()> {
    for raw in paths {
        let path = RoutePath::parse(raw)?;
        let class = rules::classify(&path);
        println!(
            "{path}\tpriority={:.1}\tchangefreq={}",
            class.priority, class.change_frequency
        );
    }
    Ok(())
}

fn cmd_cache_policy(class: Option<&str>) -> Result<()> {
    let table = CachePolicyTable::standard();
    match class {
        Some(key) => {
            if ContentClass::from_key(key).is_none() {
                warn!(class = key, "unknown content class, showing fallback policy");
            }
            println!("{}", table.policy_for(key));
        }
        None => {
            for policy in table.policies() {
                println!("{:<16} {}", policy.content_class.key(), policy.header);
            }
        }
    }
    Ok(())
}

fn cmd_headers() -> Result<()> {
    let manifest = cache::headers_manifest(&CachePolicyTable::standard())?;
    println!("{}", serde_json::to_string_pretty(&manifest)?);
    Ok(())
}

fn cmd_config_init(path: Option<&Path>) -> Result<()> {
    let written = match path {
        Some(p) => {
            write_default_config(p)?;
            p.to_path_buf()
        }
        None => init_config()?,
    };
    println!("Config initialized at: {}", written.display());
    Ok(())
}

fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = resolve_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress
// ---------------------------------------------------------------------------

/// Spinner shown while the CMS fetches are in flight.
struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            bar.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { bar }
    }

    fn finish(self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_sitemap_flags() {
        let cli = Cli::try_parse_from([
            "sitekit",
            "sitemap",
            "--out",
            "dist",
            "--offline",
            "--strict",
        ])
        .unwrap();
        match cli.command {
            Command::Sitemap {
                out,
                offline,
                strict,
                no_lastmod,
            } => {
                assert_eq!(out, Some(PathBuf::from("dist")));
                assert!(offline);
                assert!(strict);
                assert!(!no_lastmod);
            }
            _ => panic!("expected sitemap command"),
        }
    }

    #[test]
    fn classify_requires_a_path() {
        assert!(Cli::try_parse_from(["sitekit", "classify"]).is_err());
    }

    #[test]
    fn classify_rejects_malformed_path() {
        assert!(cmd_classify(&["no-leading-slash".to_string()]).is_err());
        assert!(cmd_classify(&["/blog/post".to_string()]).is_ok());
    }

    #[tokio::test]
    async fn offline_sitemap_writes_static_routes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = AppConfig::default();
        cmd_sitemap(&config, Some(dir.path()), true, true, true)
            .await
            .unwrap();

        let xml = std::fs::read_to_string(dir.path().join(publish::SITEMAP_FILE)).unwrap();
        assert_eq!(xml.matches("<url>").count(), 6);
        assert!(!xml.contains("<lastmod>"));
    }

    #[tokio::test]
    async fn strict_refuses_incomplete_sitemap() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = AppConfig::default();
        let source = StaticSource::unavailable("timeout");
        let err = write_sitemap(
            &config,
            &source,
            SitemapOptions::default(),
            dir.path(),
            true,
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("--strict"));
        assert!(!dir.path().join(publish::SITEMAP_FILE).exists());
    }

    #[test]
    fn robots_written_to_out_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        cmd_robots(&AppConfig::default(), Some(dir.path())).unwrap();
        let body = std::fs::read_to_string(dir.path().join(publish::ROBOTS_FILE)).unwrap();
        assert!(body.contains("Disallow: /studio"));
    }

    #[test]
    fn default_filters_cover_every_crate() {
        for verbose in 0..2 {
            let filter = default_filter(verbose);
            for target in ["sitekit=", "sitekit_core=", "sitekit_cms=", "sitekit_shared="] {
                assert!(filter.contains(target), "{filter} is missing {target}");
            }
        }
        assert!(default_filter(1).contains("sitekit_shared=debug"));
        assert_eq!(default_filter(2), "trace");
    }
}
