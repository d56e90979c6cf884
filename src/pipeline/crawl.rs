// src/pipeline/crawl.rs

//! Wires a real browser, asset store and workbook into one crawl.

use std::sync::Arc;

use chrono::Utc;

use crate::error::Result;
use crate::models::{CollectionTarget, Config, SiteProfile};
use crate::pipeline::{CrawlOrchestrator, RunReport};
use crate::services::{AssetStore, CloudinaryCredentials, CloudinaryStore};
use crate::storage::{CatalogSink, FlatWorkbook, SeedWorkbook};
use crate::utils::Interrupt;
use crate::utils::log;

/// Run a crawl over `targets` with `profile`.
///
/// Credentials are checked before the browser starts so a missing secret
/// fails without side effects.
#[cfg(feature = "browser")]
pub async fn run_crawler(
    config: &Config,
    profile: SiteProfile,
    targets: &[CollectionTarget],
) -> Result<RunReport> {
    use crate::driver::ChromiumDriver;

    let start_time = Utc::now();
    config.validate()?;
    profile.validate()?;

    let credentials = CloudinaryCredentials::from_env(&config.upload.credential_var)?;
    let store: Arc<dyn AssetStore> = Arc::new(CloudinaryStore::new(credentials, &config.upload)?);
    let sink = create_sink(config, &profile)?;

    let interrupt = Interrupt::new();
    interrupt.listen_for_ctrl_c();

    let driver = Arc::new(ChromiumDriver::launch(&config.browser).await?);
    let orchestrator =
        CrawlOrchestrator::new(profile, config, driver.clone(), store, sink, interrupt)?;
    let result = orchestrator.run(targets).await;

    // The orchestrator held the only other handle.
    match Arc::try_unwrap(driver) {
        Ok(driver) => {
            if let Err(e) = driver.close().await {
                ::log::warn!("Failed to close browser: {e}");
            }
        }
        Err(_) => ::log::warn!("Browser still in use, leaving it to exit with the process"),
    }
    log::sub_item("Browser closed");

    let elapsed = Utc::now() - start_time;
    ::log::info!("Finished in {}s", elapsed.num_seconds());
    result
}

/// Built without a browser backend; crawling is unavailable.
#[cfg(not(feature = "browser"))]
pub async fn run_crawler(
    _config: &Config,
    _profile: SiteProfile,
    _targets: &[CollectionTarget],
) -> Result<RunReport> {
    Err(crate::error::AppError::config(
        "this build has no browser backend; enable the `browser` feature",
    ))
}

/// Pick the workbook layout for the profile's schema.
pub fn create_sink(config: &Config, profile: &SiteProfile) -> Result<Box<dyn CatalogSink>> {
    let dir = config.output.resolve_dir();
    std::fs::create_dir_all(&dir)?;

    let sink: Box<dyn CatalogSink> = if profile.schema.is_flat() {
        Box::new(FlatWorkbook::new(&dir, &profile.output_stem, profile.resume))
    } else {
        Box::new(SeedWorkbook::new(&dir, &profile.output_stem))
    };
    Ok(sink)
}
