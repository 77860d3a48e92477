//! SiteKit CLI: build-time publishing for the marketing site.
//!
//! Generates `sitemap.xml` and `robots.txt` from static routes and CMS
//! content, and exposes the site's cache-policy table.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
