// src/services/walker.rs

//! Variant walker.
//!
//! Reads one product page: name, price, the color options and, per color,
//! the rendered images and description. Missing fields fall back to
//! sentinels; only a failed navigation or an interrupt is an error.

use std::collections::HashSet;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::driver::{PageDriver, PageScripts, Script, evaluate_as, settle, swatch_selector};
use crate::error::Result;
use crate::models::{CrawlerConfig, ProductPage, SiteProfile, Variant};
use crate::utils::Interrupt;
use crate::utils::log::sub_item;
use crate::utils::text::truncate;
use crate::utils::url::strip_query;

const UNKNOWN_PRODUCT: &str = "Unknown Product";
const MISSING_FIELD: &str = "N/A";

pub struct VariantWalker {
    driver: Arc<dyn PageDriver>,
    scripts: Arc<PageScripts>,
    profile: Arc<SiteProfile>,
    config: CrawlerConfig,
    interrupt: Interrupt,
}

impl VariantWalker {
    pub fn new(
        driver: Arc<dyn PageDriver>,
        scripts: Arc<PageScripts>,
        profile: Arc<SiteProfile>,
        config: CrawlerConfig,
        interrupt: Interrupt,
    ) -> Self {
        Self {
            driver,
            scripts,
            profile,
            config,
            interrupt,
        }
    }

    /// Load a product page and return its display name.
    ///
    /// This is the cheap existence check done before any extraction.
    pub async fn open(&self, url: &str) -> Result<String> {
        self.driver
            .navigate(url, self.config.product_timeout())
            .await?;
        settle(self.config.product_settle_ms).await;

        let name: Option<String> = self.field(&self.scripts.product_name).await;
        Ok(name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()))
    }

    /// Extract everything else from the page opened by [`Self::open`].
    pub async fn extract(&self, name: String) -> Result<ProductPage> {
        let price = self
            .field::<Option<String>>(&self.scripts.price)
            .await
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| self.profile.price_fallback.clone());

        let colors = self.discover_colors().await;
        log::info!(
            "Product: {name}, Price: {price}, Colors: {}",
            colors.join(", ")
        );

        let variants = if self.profile.click_variants {
            self.walk_variants(&colors).await?
        } else {
            vec![Variant {
                color: colors.join(", "),
                images: self.read_images().await,
                description: self.read_description().await,
            }]
        };

        Ok(ProductPage {
            name,
            price,
            colors,
            variants,
        })
    }

    /// Select each color in turn and read what it renders.
    async fn walk_variants(&self, colors: &[String]) -> Result<Vec<Variant>> {
        let mut variants = Vec::with_capacity(colors.len());
        for (idx, color) in colors.iter().enumerate() {
            self.interrupt.check()?;
            sub_item(&format!("[{}/{}] Color: {color}", idx + 1, colors.len()));

            // The first color is the one rendered on load.
            if idx > 0 {
                self.select_color(color).await;
            }

            variants.push(Variant {
                color: color.clone(),
                images: self.read_images().await,
                description: self.read_description().await,
            });
        }
        Ok(variants)
    }

    /// Click the swatch for `color`. A miss leaves the previous variant
    /// rendered.
    async fn select_color(&self, color: &str) {
        let selector = swatch_selector(&self.profile, color);
        match self.driver.click(&selector).await {
            Ok(true) => {
                settle(self.config.variant_settle_ms).await;
                sub_item("Color selected ✓");
            }
            Ok(false) => sub_item("✗ Color control not found"),
            Err(e) => log::warn!("Failed to click {color}: {}", truncate(&e.to_string(), 50)),
        }
    }

    /// Swatches, else the current selection, else the profile's sentinel.
    async fn discover_colors(&self) -> Vec<String> {
        let swatches: Vec<String> = self
            .field::<Option<Vec<String>>>(&self.scripts.color_swatches)
            .await
            .unwrap_or_default();

        let mut seen = HashSet::new();
        let colors: Vec<String> = swatches
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty() && seen.insert(c.to_lowercase()))
            .collect();
        if !colors.is_empty() {
            return colors;
        }

        let current: Option<String> = self.field(&self.scripts.current_color).await;
        match current.map(|c| c.trim().to_string()) {
            Some(color) if !color.is_empty() => vec![color],
            _ => vec![self.profile.default_color.clone()],
        }
    }

    /// Gallery images, else page images, filtered and capped.
    async fn read_images(&self) -> Vec<String> {
        let excluded = &self.profile.excluded_image_tokens;

        let gallery: Vec<String> = self
            .field::<Option<Vec<String>>>(&self.scripts.gallery_images)
            .await
            .unwrap_or_default();
        let mut images = filter_images(gallery, self.profile.gallery_host.as_deref(), excluded);

        if images.is_empty() {
            let page: Vec<String> = self
                .field::<Option<Vec<String>>>(&self.scripts.page_images)
                .await
                .unwrap_or_default();
            images = filter_images(page, self.profile.page_image_host.as_deref(), excluded);
        }

        sub_item(&format!("Found {} images", images.len()));
        images.truncate(self.profile.max_images);
        images
    }

    async fn read_description(&self) -> String {
        match evaluate_as::<Option<String>>(self.driver.as_ref(), &self.scripts.description).await {
            Ok(text) => text.unwrap_or_default(),
            Err(e) => {
                log::debug!("Description unavailable: {e}");
                MISSING_FIELD.to_string()
            }
        }
    }

    /// Evaluate a field script, treating any failure as absent.
    async fn field<T: DeserializeOwned + Default>(&self, script: &Script) -> T {
        match evaluate_as(self.driver.as_ref(), script).await {
            Ok(value) => value,
            Err(e) => {
                log::debug!("{:?} unavailable: {e}", script.kind);
                T::default()
            }
        }
    }
}

/// Keep images from `host` without excluded tokens, query-stripped and
/// unique, in page order.
fn filter_images(raw: Vec<String>, host: Option<&str>, excluded: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter(|src| host.is_none_or(|h| src.contains(h)))
        .filter(|src| !excluded.iter().any(|token| src.contains(token.as_str())))
        .map(|src| strip_query(&src))
        .filter(|src| seen.insert(src.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::driver::ScriptKind;
    use crate::models::SiteKind;
    use crate::testing::{FakePage, ScriptedDriver};

    const URL: &str = "https://shop.test/products/ao-thun";

    fn walker(kind: SiteKind, page: FakePage) -> VariantWalker {
        let profile = SiteProfile::builtin(kind);
        let scripts = PageScripts::for_site(&profile).unwrap();
        VariantWalker::new(
            Arc::new(ScriptedDriver::new().with_page(URL, page)),
            Arc::new(scripts),
            Arc::new(profile),
            CrawlerConfig::default().without_delays(),
            Interrupt::new(),
        )
    }

    async fn walk(walker: &VariantWalker) -> ProductPage {
        let name = walker.open(URL).await.unwrap();
        walker.extract(name).await.unwrap()
    }

    #[test]
    fn test_filter_images() {
        let raw = vec![
            "https://cdn.theneworiginals.co/a.jpg?v=1".to_string(),
            "https://cdn.theneworiginals.co/a.jpg?v=2".to_string(),
            "https://cdn.theneworiginals.co/logo.png".to_string(),
            "https://other.test/b.jpg".to_string(),
            "https://cdn.theneworiginals.co/c.jpg".to_string(),
        ];
        let excluded = vec!["icon".to_string(), "logo".to_string()];
        assert_eq!(
            filter_images(raw, Some("theneworiginals"), &excluded),
            [
                "https://cdn.theneworiginals.co/a.jpg",
                "https://cdn.theneworiginals.co/c.jpg"
            ]
        );
    }

    #[tokio::test]
    async fn test_color_falls_back_to_sentinel() {
        let page = FakePage::new()
            .answer(ScriptKind::ProductName, json!("Áo Thun ABC"))
            .answer(ScriptKind::ColorSwatches, json!([]))
            .answer(ScriptKind::CurrentColor, json!(null));

        let coolmate = walk(&walker(SiteKind::Coolmate, page.clone())).await;
        assert_eq!(coolmate.colors, ["default"]);
        assert_eq!(coolmate.variants.len(), 1);
        assert_eq!(coolmate.variants[0].color, "default");

        let tno = walk(&walker(SiteKind::TheNewOriginals, page)).await;
        assert_eq!(tno.colors, ["N/A"]);
        assert_eq!(tno.variants.len(), 1);
    }

    #[tokio::test]
    async fn test_current_color_used_without_swatches() {
        let page = FakePage::new()
            .answer(ScriptKind::ColorSwatches, json!([]))
            .answer(ScriptKind::CurrentColor, json!(" Be "));
        let product = walk(&walker(SiteKind::TheNewOriginals, page)).await;
        assert_eq!(product.colors, ["Be"]);
    }

    #[tokio::test]
    async fn test_swatches_deduplicated_case_insensitively() {
        let page = FakePage::new().answer(
            ScriptKind::ColorSwatches,
            json!(["Đen", "đen", "Trắng", ""]),
        );
        let product = walk(&walker(SiteKind::TheNewOriginals, page)).await;
        assert_eq!(product.colors, ["Đen", "Trắng"]);
        assert_eq!(product.variants[0].color, "Đen, Trắng");
    }

    #[tokio::test]
    async fn test_missing_fields_use_fallbacks() {
        let page = FakePage::new().failing(ScriptKind::Description);
        let product = walk(&walker(SiteKind::TheNewOriginals, page)).await;
        assert_eq!(product.name, "Unknown Product");
        assert_eq!(product.price, "N/A");
        assert_eq!(product.variants[0].description, "N/A");

        let seed = walk(&walker(SiteKind::Seed, FakePage::new())).await;
        assert_eq!(seed.price, "0");
    }

    #[tokio::test]
    async fn test_gallery_falls_back_to_page_images() {
        let page = FakePage::new()
            .answer(ScriptKind::GalleryImages, json!(["https://cdn.test/icon.svg"]))
            .answer(
                ScriptKind::PageImages,
                json!([
                    "https://theneworiginals.co/cdn/a.jpg?width=800",
                    "https://elsewhere.test/b.jpg"
                ]),
            );
        let product = walk(&walker(SiteKind::TheNewOriginals, page)).await;
        assert_eq!(
            product.variants[0].images,
            ["https://theneworiginals.co/cdn/a.jpg"]
        );
    }

    #[tokio::test]
    async fn test_images_capped_in_discovery_order() {
        let images: Vec<String> = (0..20)
            .map(|i| format!("https://n7media.coolmate.me/uploads/{i}.jpg"))
            .collect();
        let page = FakePage::new().answer(ScriptKind::GalleryImages, json!(images));
        let product = walk(&walker(SiteKind::Coolmate, page)).await;
        assert_eq!(product.variants[0].images, images[..10]);
    }

    #[tokio::test]
    async fn test_clicks_through_each_variant() {
        let profile = SiteProfile::builtin(SiteKind::Coolmate);
        let page = FakePage::new()
            .answer(ScriptKind::ProductName, json!("Áo Polo"))
            .answer(ScriptKind::ColorSwatches, json!(["Đen", "Trắng", "Xanh"]))
            .answer(
                ScriptKind::GalleryImages,
                json!(["https://n7media.coolmate.me/den.jpg"]),
            )
            .clickable(&swatch_selector(&profile, "Trắng"), "Trắng")
            .color_answer(
                "Trắng",
                ScriptKind::GalleryImages,
                json!(["https://n7media.coolmate.me/trang.jpg"]),
            );

        let product = walk(&walker(SiteKind::Coolmate, page)).await;
        let images: Vec<_> = product
            .variants
            .iter()
            .map(|v| (v.color.as_str(), v.images[0].as_str()))
            .collect();
        // "Xanh" has no control, so the white gallery is still rendered
        assert_eq!(
            images,
            [
                ("Đen", "https://n7media.coolmate.me/den.jpg"),
                ("Trắng", "https://n7media.coolmate.me/trang.jpg"),
                ("Xanh", "https://n7media.coolmate.me/trang.jpg"),
            ]
        );
    }

    #[tokio::test]
    async fn test_navigation_failure_is_an_error() {
        let walker = walker(SiteKind::TheNewOriginals, FakePage::new());
        assert!(walker.open("https://shop.test/products/missing").await.is_err());
    }
}
