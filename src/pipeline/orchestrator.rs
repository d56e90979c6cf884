// src/pipeline/orchestrator.rs

//! Crawl orchestrator.
//!
//! Drives collections → products → variants → uploads → sink, one unit at
//! a time. Each product and collection yields an explicit outcome; only an
//! interrupt escapes the per-unit handling. The sink is always finalized.

use std::collections::HashSet;
use std::sync::Arc;

use crate::driver::{PageDriver, PageScripts};
use crate::error::Result;
use crate::models::{
    CollectionTarget, Config, ProductPage, ProductRef, Schema, SeedProduct,
    SiteProfile, VariantRecord,
};
use crate::services::{
    AssetRelocator, AssetStore, CollectionPaginator, DescriptionGenerator, IdKind,
    ProductNameFormatter, SeedRegistry, VariantWalker,
};
use crate::storage::{CatalogSink, Record, SinkSummary};
use crate::utils::Interrupt;
use crate::utils::log;
use crate::utils::text::{folder_segment, normalize_color, parse_price, truncate};

/// Why a product produced no records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Its name is already in the output
    AlreadyCrawled,
    /// Listed by an earlier collection of this run
    DuplicateUrl,
    /// Every image upload failed or none were found
    NoImages,
}

/// Result of processing one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductOutcome {
    /// Number of records handed to the sink
    Committed(usize),
    Skipped(SkipReason),
}

/// Tally for one collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionOutcome {
    pub found: usize,
    pub committed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// What a whole run did.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub collections: usize,
    pub failed_collections: usize,
    pub products_found: usize,
    pub products_committed: usize,
    pub products_skipped: usize,
    pub products_failed: usize,
    /// Stopped by the user
    pub interrupted: bool,
    /// Unexpected error that ended the run early
    pub error: Option<String>,
    pub sink: SinkSummary,
}

impl RunReport {
    fn absorb(&mut self, outcome: &CollectionOutcome) {
        self.products_found += outcome.found;
        self.products_committed += outcome.committed;
        self.products_skipped += outcome.skipped;
        self.products_failed += outcome.failed;
    }
}

pub struct CrawlOrchestrator {
    profile: Arc<SiteProfile>,
    paginator: CollectionPaginator,
    walker: VariantWalker,
    relocator: AssetRelocator,
    sink: Box<dyn CatalogSink>,
    registry: SeedRegistry,
    rng: fastrand::Rng,
    interrupt: Interrupt,
    upload_root: String,
    max_pages: usize,
    max_products: Option<usize>,
    /// Product names already in the output
    crawled: HashSet<String>,
    /// Product URLs handled this run
    visited: HashSet<String>,
}

impl CrawlOrchestrator {
    pub fn new(
        profile: SiteProfile,
        config: &Config,
        driver: Arc<dyn PageDriver>,
        store: Arc<dyn AssetStore>,
        sink: Box<dyn CatalogSink>,
        interrupt: Interrupt,
    ) -> Result<Self> {
        let crawler = &config.crawler;
        let scripts = Arc::new(PageScripts::for_site(&profile)?);
        let profile = Arc::new(profile);

        let rng = match crawler.description_seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };

        Ok(Self {
            paginator: CollectionPaginator::new(
                driver.clone(),
                scripts.clone(),
                crawler.clone(),
                interrupt.clone(),
            ),
            walker: VariantWalker::new(
                driver,
                scripts,
                profile.clone(),
                crawler.clone(),
                interrupt.clone(),
            ),
            relocator: AssetRelocator::new(store, profile.origin.clone(), config.upload.timeout()),
            upload_root: config
                .upload
                .root_folder
                .clone()
                .unwrap_or_else(|| profile.upload_root.clone()),
            max_pages: crawler.max_pages.unwrap_or(profile.max_pages),
            max_products: crawler.max_products.or(profile.max_products),
            sink,
            registry: SeedRegistry::new(),
            rng,
            interrupt,
            crawled: HashSet::new(),
            visited: HashSet::new(),
            profile,
        })
    }

    /// Crawl every collection, then finalize the sink whatever happened.
    ///
    /// Errors are only returned when the final save itself fails.
    pub async fn run(mut self, targets: &[CollectionTarget]) -> Result<RunReport> {
        log::header(&format!(
            "{} crawler: {} collection(s)",
            self.profile.name,
            targets.len()
        ));

        let mut report = RunReport {
            collections: targets.len(),
            ..RunReport::default()
        };

        match self.crawl(targets, &mut report).await {
            Ok(()) => {}
            Err(e) if e.is_interrupt() => {
                log::header("SCRIPT INTERRUPTED BY USER (Ctrl+C)");
                report.interrupted = true;
            }
            Err(e) => {
                ::log::error!("Script error: {e}");
                report.error = Some(e.to_string());
            }
        }

        report.sink = self.sink.finalize(&self.registry).await?;
        self.log_summary(&report);
        Ok(report)
    }

    async fn crawl(&mut self, targets: &[CollectionTarget], report: &mut RunReport) -> Result<()> {
        self.crawled = self.sink.load_existing().await?;
        if !self.crawled.is_empty() {
            ::log::info!(
                "Will skip {} already crawled product(s)",
                self.crawled.len()
            );
        }

        for (idx, target) in targets.iter().enumerate() {
            self.interrupt.check()?;
            log::header(&format!(
                "[Collection {}/{}] {}",
                idx + 1,
                targets.len(),
                target.url()
            ));
            ::log::info!("Category: {}", target.category());

            match self.crawl_collection(target).await {
                Ok(outcome) => report.absorb(&outcome),
                Err(e) if e.is_interrupt() => return Err(e),
                Err(e) => {
                    ::log::warn!(
                        "Error crawling collection {}: {}",
                        target.url(),
                        truncate(&e.to_string(), 100)
                    );
                    report.failed_collections += 1;
                }
            }
        }
        Ok(())
    }

    async fn crawl_collection(&mut self, target: &CollectionTarget) -> Result<CollectionOutcome> {
        let products = self
            .paginator
            .paginate(target, self.max_pages, self.max_products)
            .await?;
        let mut outcome = CollectionOutcome {
            found: products.len(),
            ..CollectionOutcome::default()
        };

        for (idx, product) in products.iter().enumerate() {
            self.interrupt.check()?;
            log::separator();
            log::step("Product", idx + 1, products.len(), &product.url);
            log::sub_item(&format!(
                "Progress: {} record(s) saved so far",
                self.sink.committed()
            ));

            match self.crawl_product(product).await {
                Ok(ProductOutcome::Committed(_)) => outcome.committed += 1,
                Ok(ProductOutcome::Skipped(reason)) => {
                    log::sub_item(&format!("Skipped: {reason:?}"));
                    outcome.skipped += 1;
                }
                Err(e) if e.is_interrupt() => return Err(e),
                Err(e) => {
                    ::log::warn!("Error crawling product: {}", truncate(&e.to_string(), 100));
                    log::sub_item("→ Skipping to next product...");
                    outcome.failed += 1;
                }
            }
        }
        Ok(outcome)
    }

    async fn crawl_product(&mut self, product: &ProductRef) -> Result<ProductOutcome> {
        if !self.visited.insert(product.url.clone()) {
            return Ok(ProductOutcome::Skipped(SkipReason::DuplicateUrl));
        }

        let name = self.walker.open(&product.url).await?;
        if self.crawled.contains(&name) {
            return Ok(ProductOutcome::Skipped(SkipReason::AlreadyCrawled));
        }

        let page = self.walker.extract(name).await?;
        match self.profile.schema {
            Schema::PerVariant | Schema::PerProduct => self.commit_rows(product, page).await,
            Schema::Seed => self.commit_seed(product, page).await,
        }
    }

    /// Upload and commit one flat row per variant that kept any image.
    async fn commit_rows(&mut self, product: &ProductRef, page: ProductPage) -> Result<ProductOutcome> {
        let mut committed = 0;
        let product_folder = format!(
            "{}/{}/{}",
            self.upload_root,
            product.category,
            folder_segment(&page.name)
        );

        for variant in page.variants {
            self.interrupt.check()?;
            let folder = match self.profile.schema {
                Schema::PerVariant => format!("{product_folder}/{}", variant.color),
                _ => product_folder.clone(),
            };

            let images = self
                .relocator
                .relocate_all(&variant.images, &folder, &self.interrupt)
                .await?;
            if images.is_empty() {
                log::sub_item(&format!("⚠️ No images saved for {}", variant.color));
                continue;
            }

            let uploaded = images.len();
            self.sink
                .commit(Record::Row(VariantRecord {
                    category: product.category.clone(),
                    product_name: page.name.clone(),
                    price: page.price.clone(),
                    color: variant.color.clone(),
                    images,
                    description: variant.description,
                }))
                .await?;
            committed += 1;
            log::sub_item(&format!(
                "✓ Saved {uploaded} images for {}",
                variant.color
            ));
        }

        if committed == 0 {
            return Ok(ProductOutcome::Skipped(SkipReason::NoImages));
        }
        if self.profile.schema != Schema::PerVariant {
            self.crawled.insert(page.name);
        }
        Ok(ProductOutcome::Committed(committed))
    }

    /// Upload, then assign ids and buffer one seed product.
    ///
    /// Category and product ids are only taken once an image is stored,
    /// so failed products leave no gaps in them.
    async fn commit_seed(&mut self, product: &ProductRef, page: ProductPage) -> Result<ProductOutcome> {
        let formatted = ProductNameFormatter::format(&page.name);
        let price = parse_price(&page.price);
        let first_color = normalize_color(page.colors.first().map(String::as_str).unwrap_or_default());
        let description = DescriptionGenerator::generate(&formatted, &first_color, &mut self.rng);

        ::log::info!("Formatted: {formatted}, Price: {price}");

        // Colors are registered on sight, even if the product is dropped later.
        let color_ids: Vec<u32> = page
            .colors
            .iter()
            .map(|color| self.registry.get_or_create(IdKind::Color, color))
            .collect();

        let images: Vec<String> = page
            .variants
            .into_iter()
            .flat_map(|v| v.images)
            .take(self.profile.max_images)
            .collect();
        let folder = format!(
            "{}/{}/{}",
            self.upload_root,
            product.category,
            folder_segment(&formatted)
        );
        let images = self
            .relocator
            .relocate_all(&images, &folder, &self.interrupt)
            .await?;
        if images.is_empty() {
            log::sub_item("⚠️ No images saved");
            return Ok(ProductOutcome::Skipped(SkipReason::NoImages));
        }

        let category_id = self.registry.get_or_create(IdKind::Category, &product.category);
        let id = self.registry.next_product_id();
        let uploaded = images.len();

        self.sink
            .commit(Record::Seed(SeedProduct {
                id,
                category_id,
                name: formatted,
                description,
                selling_price: price,
                color_ids,
                images,
            }))
            .await?;
        self.crawled.insert(page.name);

        log::sub_item(&format!("✓ Saved product ID={id} with {uploaded} images"));
        Ok(ProductOutcome::Committed(1))
    }

    fn log_summary(&self, report: &RunReport) {
        let mut items = vec![
            ("Collections", report.collections.to_string()),
            ("Products found", report.products_found.to_string()),
            ("Products saved", report.products_committed.to_string()),
            ("Skipped", report.products_skipped.to_string()),
            ("Failed", report.products_failed.to_string()),
            ("Rows saved", report.sink.rows.to_string()),
        ];
        if self.profile.schema == Schema::Seed {
            items.push(("Categories", report.sink.categories.to_string()));
            items.push(("Colors", report.sink.colors.to_string()));
        }
        if let Some(path) = &report.sink.path {
            items.push(("Output", path.display().to_string()));
        }
        log::summary("Crawl complete", &items);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::driver::{ScriptKind, swatch_selector};
    use crate::models::SiteKind;
    use crate::storage::FlatWorkbook;
    use crate::testing::{FakePage, FakeStore, MemorySink, ScriptedDriver};

    const COLLECTION: &str = "https://shop.test/collections/ao-thun";

    fn product_url(i: usize) -> String {
        format!("https://shop.test/products/p{i}")
    }

    fn listing(count: usize) -> FakePage {
        let links: Vec<String> = (1..=count).map(product_url).collect();
        FakePage::new()
            .answer(ScriptKind::ProductLinks, json!(links))
            .answer(ScriptKind::HasNextPage, json!(false))
    }

    fn product(name: &str, images: usize) -> FakePage {
        let images: Vec<String> = (0..images)
            .map(|i| format!("https://theneworiginals.co/cdn/{}-{i}.jpg", name.replace(' ', "-")))
            .collect();
        FakePage::new()
            .answer(ScriptKind::ProductName, json!(name))
            .answer(ScriptKind::Price, json!("159.000 đ"))
            .answer(ScriptKind::ColorSwatches, json!(["Đen", "Trắng Xanh"]))
            .answer(ScriptKind::GalleryImages, json!(images))
            .answer(ScriptKind::Description, json!("Mềm mại"))
    }

    fn shop(products: &[(&str, usize)]) -> ScriptedDriver {
        products.iter().enumerate().fold(
            ScriptedDriver::new().with_page(COLLECTION, listing(products.len())),
            |driver, (i, (name, images))| driver.with_page(&product_url(i + 1), product(name, *images)),
        )
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.crawler = config.crawler.without_delays();
        config.crawler.description_seed = Some(42);
        config
    }

    fn orchestrator(
        kind: SiteKind,
        driver: ScriptedDriver,
        store: Arc<FakeStore>,
        sink: Box<dyn CatalogSink>,
        interrupt: Interrupt,
    ) -> CrawlOrchestrator {
        CrawlOrchestrator::new(
            SiteProfile::builtin(kind),
            &config(),
            Arc::new(driver),
            store,
            sink,
            interrupt,
        )
        .unwrap()
    }

    fn targets(kind: SiteKind, urls: &[&str]) -> Vec<CollectionTarget> {
        let profile = SiteProfile::builtin(kind);
        urls.iter().map(|u| CollectionTarget::new(*u, &profile)).collect()
    }

    fn rows(sink: &MemorySink) -> Vec<VariantRecord> {
        sink.records()
            .into_iter()
            .filter_map(|r| match r {
                Record::Row(row) => Some(row),
                Record::Seed(_) => None,
            })
            .collect()
    }

    fn seeds(sink: &MemorySink) -> Vec<SeedProduct> {
        sink.records()
            .into_iter()
            .filter_map(|r| match r {
                Record::Seed(product) => Some(product),
                Record::Row(_) => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_per_product_rows() {
        let sink = MemorySink::new();
        let store = Arc::new(FakeStore::new());
        let report = orchestrator(
            SiteKind::TheNewOriginals,
            shop(&[("Áo Thun ABC", 2), ("Áo Thun XYZ", 1)]),
            store.clone(),
            Box::new(sink.clone()),
            Interrupt::new(),
        )
        .run(&targets(SiteKind::TheNewOriginals, &[COLLECTION]))
        .await
        .unwrap();

        let rows = rows(&sink);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category, "ao-thun");
        assert_eq!(rows[0].product_name, "Áo Thun ABC");
        assert_eq!(rows[0].price, "159.000 đ");
        assert_eq!(rows[0].color, "Đen, Trắng Xanh");
        assert_eq!(rows[0].images.len(), 2);
        assert_eq!(store.uploads()[0].1, "theneworiginals/ao-thun/Áo_Thun_ABC");

        assert_eq!(report.products_found, 2);
        assert_eq!(report.products_committed, 2);
        assert_eq!(report.sink.rows, 2);
        assert_eq!(sink.finalized(), 1);
    }

    #[tokio::test]
    async fn test_zero_image_product_is_dropped() {
        let sink = MemorySink::new();
        let store = Arc::new(FakeStore::new().failing_all());
        let report = orchestrator(
            SiteKind::TheNewOriginals,
            shop(&[("Áo Thun ABC", 3)]),
            store.clone(),
            Box::new(sink.clone()),
            Interrupt::new(),
        )
        .run(&targets(SiteKind::TheNewOriginals, &[COLLECTION]))
        .await
        .unwrap();

        assert_eq!(store.uploads().len(), 3);
        assert!(sink.records().is_empty());
        assert_eq!(report.products_committed, 0);
        assert_eq!(report.products_skipped, 1);
        assert_eq!(report.sink.rows, 0);
    }

    #[tokio::test]
    async fn test_resume_skips_known_product_without_uploads() {
        let sink = MemorySink::new().with_existing(&["Áo Thun ABC"]);
        let store = Arc::new(FakeStore::new());
        let report = orchestrator(
            SiteKind::TheNewOriginals,
            shop(&[("Áo Thun ABC", 3)]),
            store.clone(),
            Box::new(sink.clone()),
            Interrupt::new(),
        )
        .run(&targets(SiteKind::TheNewOriginals, &[COLLECTION]))
        .await
        .unwrap();

        assert!(sink.records().is_empty());
        assert!(store.uploads().is_empty());
        assert_eq!(report.products_skipped, 1);
    }

    #[tokio::test]
    async fn test_product_failure_does_not_stop_the_run() {
        // product 2 is not scripted, so it fails to load
        let driver = ScriptedDriver::new()
            .with_page(COLLECTION, listing(3))
            .with_page(&product_url(1), product("Áo A", 1))
            .with_page(&product_url(3), product("Áo C", 1));
        let sink = MemorySink::new();
        let report = orchestrator(
            SiteKind::TheNewOriginals,
            driver,
            Arc::new(FakeStore::new()),
            Box::new(sink.clone()),
            Interrupt::new(),
        )
        .run(&targets(SiteKind::TheNewOriginals, &[COLLECTION]))
        .await
        .unwrap();

        let names: Vec<_> = rows(&sink).into_iter().map(|r| r.product_name).collect();
        assert_eq!(names, ["Áo A", "Áo C"]);
        assert_eq!(report.products_failed, 1);
    }

    #[tokio::test]
    async fn test_interrupt_still_flushes_committed_rows() {
        let dir = tempfile::TempDir::new().unwrap();
        let interrupt = Interrupt::new();
        let driver = shop(&[("Áo 1", 1), ("Áo 2", 1), ("Áo 3", 1), ("Áo 4", 1), ("Áo 5", 1)])
            .interrupt_on(&product_url(4), interrupt.clone());
        let sink = FlatWorkbook::new(dir.path(), "tno_data", true);

        let report = orchestrator(
            SiteKind::TheNewOriginals,
            driver,
            Arc::new(FakeStore::new()),
            Box::new(sink),
            interrupt,
        )
        .run(&targets(SiteKind::TheNewOriginals, &[COLLECTION]))
        .await
        .unwrap();

        assert!(report.interrupted);
        assert_eq!(report.sink.rows, 3);

        let mut reread = FlatWorkbook::new(dir.path(), "tno_data", true);
        let names = reread.load_existing().await.unwrap();
        assert_eq!(names.len(), 3);
        assert!(names.contains("Áo 3"));
        assert!(!names.contains("Áo 4"));
    }

    #[tokio::test]
    async fn test_finalize_runs_after_fatal_error() {
        let sink = MemorySink::new().failing_load();
        let report = orchestrator(
            SiteKind::TheNewOriginals,
            shop(&[("Áo A", 1)]),
            Arc::new(FakeStore::new()),
            Box::new(sink.clone()),
            Interrupt::new(),
        )
        .run(&targets(SiteKind::TheNewOriginals, &[COLLECTION]))
        .await
        .unwrap();

        assert!(report.error.is_some());
        assert_eq!(sink.finalized(), 1);
    }

    #[tokio::test]
    async fn test_image_cap_limits_upload_attempts() {
        let store = Arc::new(FakeStore::new());
        orchestrator(
            SiteKind::Seed,
            shop(&[("Áo Thun Relaxed Fit Sea", 20)]),
            store.clone(),
            Box::new(MemorySink::new()),
            Interrupt::new(),
        )
        .run(&targets(SiteKind::Seed, &[COLLECTION]))
        .await
        .unwrap();

        let attempted: Vec<_> = store.uploads().into_iter().map(|(url, _)| url).collect();
        let expected: Vec<_> = (0..10)
            .map(|i| format!("https://theneworiginals.co/cdn/Áo-Thun-Relaxed-Fit-Sea-{i}.jpg"))
            .collect();
        assert_eq!(attempted, expected);
    }

    #[tokio::test]
    async fn test_seed_colors_registered_on_sight_product_ids_on_success() {
        let driver = ScriptedDriver::new()
            .with_page(COLLECTION, listing(3))
            .with_page(&product_url(1), product("Áo Thun Relaxed Fit Sea", 1))
            .with_page(
                &product_url(2),
                product("Áo Polo Basic", 1).answer(ScriptKind::ColorSwatches, json!(["Be"])),
            )
            .with_page(
                &product_url(3),
                product("Áo Khoác Bomber", 1).answer(ScriptKind::ColorSwatches, json!(["Trắng Cổ Đen", "Xám"])),
            );
        let store = Arc::new(
            FakeStore::new().failing("https://theneworiginals.co/cdn/Áo-Polo-Basic-0.jpg"),
        );
        let sink = MemorySink::new();
        let report = orchestrator(
            SiteKind::Seed,
            driver,
            store,
            Box::new(sink.clone()),
            Interrupt::new(),
        )
        .run(&targets(SiteKind::Seed, &[COLLECTION]))
        .await
        .unwrap();

        let products = seeds(&sink);
        assert_eq!(products.len(), 2);

        assert_eq!(products[0].id, 1);
        assert_eq!(products[0].name, "Áo Thun Relaxed Fit - Sea");
        assert_eq!(products[0].selling_price, 159000);
        assert_eq!(products[0].category_id, 1);
        assert_eq!(products[0].color_ids, [1, 2]);
        assert!(products[0].description.starts_with("Áo thun relaxed fit với form rộng"));
        assert!(products[0].description.contains("áo đen"));

        // the failed polo took no product id, but "Be" still got color id 3
        assert_eq!(products[1].id, 2);
        assert_eq!(products[1].name, "Áo Khoác Bomber - Classic");
        assert_eq!(products[1].color_ids, [2, 4]);

        assert_eq!(report.sink.categories, 1);
        assert_eq!(report.sink.colors, 4);
    }

    #[tokio::test]
    async fn test_seed_category_is_title_cased_and_folder_uses_formatted_name() {
        let store = Arc::new(FakeStore::new());
        let sink = MemorySink::new();
        orchestrator(
            SiteKind::Seed,
            shop(&[("Áo Thun Relaxed Fit Sea", 1)]),
            store.clone(),
            Box::new(sink.clone()),
            Interrupt::new(),
        )
        .run(&targets(SiteKind::Seed, &[COLLECTION]))
        .await
        .unwrap();

        assert_eq!(
            store.uploads()[0].1,
            "theneworiginals/Ao Thun/Áo_Thun_Relaxed_Fit_-_Sea"
        );
    }

    #[tokio::test]
    async fn test_per_variant_rows_and_folders() {
        let profile = SiteProfile::builtin(SiteKind::Coolmate);
        let collection = "https://shop.test/collection/ao-polo";
        let product_page = FakePage::new()
            .answer(ScriptKind::ProductName, json!("Áo Polo"))
            .answer(ScriptKind::Price, json!("299.000đ"))
            .answer(ScriptKind::ColorSwatches, json!(["Đen", "Trắng"]))
            .answer(
                ScriptKind::GalleryImages,
                json!(["https://n7media.coolmate.me/uploads/den.jpg"]),
            )
            .clickable(&swatch_selector(&profile, "Trắng"), "Trắng")
            .color_answer(
                "Trắng",
                ScriptKind::GalleryImages,
                json!(["https://n7media.coolmate.me/uploads/trang.jpg"]),
            );
        let driver = ScriptedDriver::new()
            .with_page(collection, listing(1))
            .with_page(&product_url(1), product_page);
        let store = Arc::new(FakeStore::new());
        let sink = MemorySink::new();

        orchestrator(
            SiteKind::Coolmate,
            driver,
            store.clone(),
            Box::new(sink.clone()),
            Interrupt::new(),
        )
        .run(&targets(SiteKind::Coolmate, &[collection]))
        .await
        .unwrap();

        let rows = rows(&sink);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].color, "Trắng");
        assert_eq!(rows[1].images, ["https://assets.test/coolmate/ao-polo/Áo_Polo/Trắng/trang.jpg"]);
        assert_eq!(store.uploads()[0].1, "coolmate/ao-polo/Áo_Polo/Đen");
    }

    #[tokio::test]
    async fn test_product_in_two_collections_is_crawled_once() {
        let second = "https://shop.test/collections/best-sellers";
        let driver = Arc::new(shop(&[("Áo A", 1)]).with_page(second, listing(1)));
        let sink = MemorySink::new();
        let report = CrawlOrchestrator::new(
            SiteProfile::builtin(SiteKind::TheNewOriginals),
            &config(),
            driver.clone(),
            Arc::new(FakeStore::new()),
            Box::new(sink.clone()),
            Interrupt::new(),
        )
        .unwrap()
        .run(&targets(SiteKind::TheNewOriginals, &[COLLECTION, second]))
        .await
        .unwrap();

        assert_eq!(sink.records().len(), 1);
        assert_eq!(report.products_found, 2);
        assert_eq!(report.products_skipped, 1);
        assert_eq!(
            driver.navigations(),
            [COLLECTION, product_url(1).as_str(), second]
        );
    }
}
