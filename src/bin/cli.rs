//! Catalog Crawler CLI
//!
//! Local execution entry point.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use catalog_crawler::{
    error::Result,
    models::{CollectionTarget, Config, SiteKind, SiteProfile},
    pipeline,
    services::CloudinaryCredentials,
};

/// Catalog Crawler - storefront collections to product spreadsheets
#[derive(Parser, Debug)]
#[command(
    name = "catalog-crawler",
    version,
    about = "Crawls storefront collections into product spreadsheets"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "crawler.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl one or more collection URLs
    Crawl {
        /// Storefront to crawl
        #[arg(long, value_enum)]
        site: Site,

        /// Custom site profile (TOML) replacing the built-in one
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Directory for the output workbook
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Listing pages to read per collection
        #[arg(long)]
        max_pages: Option<usize>,

        /// Products to keep per collection
        #[arg(long)]
        max_products: Option<usize>,

        /// Run the browser without a window
        #[arg(long)]
        headless: bool,

        /// Collection URLs; read from stdin when omitted
        urls: Vec<String>,
    },

    /// Validate configuration and credential
    Validate,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Site {
    Coolmate,
    Tno,
    Seed,
}

impl From<Site> for SiteKind {
    fn from(site: Site) -> Self {
        match site {
            Site::Coolmate => SiteKind::Coolmate,
            Site::Tno => SiteKind::TheNewOriginals,
            Site::Seed => SiteKind::Seed,
        }
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Prompt for collection URLs until a blank line.
fn read_urls(profile: &SiteProfile) -> Result<Vec<String>> {
    println!(
        "Enter collection URLs containing '{}' (one per line, blank line to start):",
        profile.path_marker
    );

    let mut urls = Vec::new();
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if profile.accepts(line) {
            urls.push(line.to_string());
        } else {
            log::warn!("Not a {} collection URL: {line}", profile.name);
        }
    }
    Ok(urls)
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Crawl {
            site,
            profile,
            output_dir,
            max_pages,
            max_products,
            headless,
            urls,
        } => {
            let profile = match profile {
                Some(path) => SiteProfile::load(path)?,
                None => SiteProfile::builtin(site.into()),
            };

            if output_dir.is_some() {
                config.output.dir = output_dir;
            }
            if max_pages.is_some() {
                config.crawler.max_pages = max_pages;
            }
            if max_products.is_some() {
                config.crawler.max_products = max_products;
            }
            config.browser.headless |= headless;

            let urls = if urls.is_empty() {
                read_urls(&profile)?
            } else {
                urls.into_iter()
                    .filter(|url| {
                        let ok = profile.accepts(url);
                        if !ok {
                            log::warn!("Not a {} collection URL: {url}", profile.name);
                        }
                        ok
                    })
                    .collect()
            };
            if urls.is_empty() {
                log::warn!("No valid URLs provided!");
                return Ok(());
            }

            let targets: Vec<_> = urls
                .iter()
                .map(|url| CollectionTarget::new(url.as_str(), &profile))
                .collect();
            let report = pipeline::run_crawler(&config, profile, &targets).await?;

            if let Some(error) = report.error {
                log::error!("Crawl ended early: {error}");
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");

            let credentials = CloudinaryCredentials::from_env(&config.upload.credential_var)?;
            log::info!("✓ Credential OK ({credentials:?})");

            log::info!("All validations passed!");
        }
    }

    Ok(())
}
