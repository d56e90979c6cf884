// src/services/paginator.rs

//! Collection paginator.
//!
//! Walks `?page=N` listing pages and gathers product URLs in discovery
//! order. A page that fails to load ends the collection early with what
//! was gathered so far.

use std::collections::HashSet;
use std::sync::Arc;

use crate::driver::{PageDriver, PageScripts, evaluate_as, settle};
use crate::error::Result;
use crate::models::{CollectionTarget, CrawlerConfig, ProductRef};
use crate::utils::Interrupt;
use crate::utils::log::sub_item;
use crate::utils::text::truncate;
use crate::utils::url::{page_url, strip_query};

/// Links and "next" affordance read from one listing page.
struct ListingPage {
    links: Vec<String>,
    has_next: bool,
}

pub struct CollectionPaginator {
    driver: Arc<dyn PageDriver>,
    scripts: Arc<PageScripts>,
    config: CrawlerConfig,
    interrupt: Interrupt,
}

impl CollectionPaginator {
    pub fn new(
        driver: Arc<dyn PageDriver>,
        scripts: Arc<PageScripts>,
        config: CrawlerConfig,
        interrupt: Interrupt,
    ) -> Self {
        Self {
            driver,
            scripts,
            config,
            interrupt,
        }
    }

    /// Product references of one collection, unique and in page order.
    ///
    /// Stops on a page without new links, a page without an enabled "next"
    /// control, after `max_pages`, or once `max_items` links are held.
    /// Only an interrupt is returned as an error.
    pub async fn paginate(
        &self,
        target: &CollectionTarget,
        max_pages: usize,
        max_items: Option<usize>,
    ) -> Result<Vec<ProductRef>> {
        let cap = max_items.unwrap_or(usize::MAX);
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for page in 1..=max_pages {
            self.interrupt.check()?;

            let url = page_url(target.url(), page);
            log::info!("  Page {page}: {url}");

            let listing = match self.read_page(&url).await {
                Ok(listing) => listing,
                Err(e) => {
                    log::warn!("Error on page {page}: {}", truncate(&e.to_string(), 50));
                    break;
                }
            };

            let before = links.len();
            for link in listing.links {
                if links.len() >= cap {
                    break;
                }
                let link = strip_query(&link);
                if seen.insert(link.clone()) {
                    links.push(link);
                }
            }
            let added = links.len() - before;
            sub_item(&format!("{added} new products"));

            if added == 0 || links.len() >= cap || !listing.has_next {
                break;
            }
        }

        links.truncate(cap);
        log::info!("  Total unique products: {}", links.len());

        Ok(links
            .iter()
            .map(|url| ProductRef::new(url, target.category()))
            .collect())
    }

    async fn read_page(&self, url: &str) -> Result<ListingPage> {
        let driver = self.driver.as_ref();
        driver
            .navigate(url, self.config.collection_timeout())
            .await?;
        settle(self.config.listing_settle_ms).await;

        driver.evaluate(&self.scripts.scroll_to_bottom).await?;
        settle(self.config.scroll_settle_ms).await;

        let links: Vec<String> = evaluate_as(driver, &self.scripts.product_links).await?;
        if links.is_empty() {
            return Ok(ListingPage { links, has_next: false });
        }
        // A failed check ends the collection but keeps this page's links.
        let has_next = evaluate_as(driver, &self.scripts.has_next_page)
            .await
            .unwrap_or_else(|e| {
                log::warn!("Next page check failed: {}", truncate(&e.to_string(), 50));
                false
            });
        Ok(ListingPage { links, has_next })
    }
}
