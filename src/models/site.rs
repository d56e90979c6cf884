// src/models/site.rs

//! Storefront profiles: DOM selectors, limits and output shape per site.
//!
//! The three crawlers share one engine; everything that differs between
//! them lives here.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Built-in storefront profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteKind {
    /// coolmate.me, one row per color variant
    Coolmate,
    /// theneworiginals.co, one row per product with all colors joined
    TheNewOriginals,
    /// theneworiginals.co, three-table seed export
    Seed,
}

/// Shape of the records a profile emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Schema {
    /// One flat row per color variant
    PerVariant,
    /// One flat row per product, colors joined
    PerProduct,
    /// Normalized categories/colors/products, written once at the end
    Seed,
}

impl Schema {
    /// Whether records go to the incremental flat workbook.
    pub fn is_flat(&self) -> bool {
        !matches!(self, Schema::Seed)
    }
}

/// How the category label is derived from the collection slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryStyle {
    /// The raw slug (`ao-thun`), `unknown` when absent
    Slug,
    /// Title-cased words (`Ao Thun`), `Unknown` when absent
    Title,
}

/// Where explicit color swatches are read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SwatchSource {
    /// `<img alt="{prefix}{color}">` inside a clickable button
    AltPrefix { prefix: String },
    /// `<input name="{name}" value="{color}">`
    InputName { name: String },
}

/// Where the currently selected color is read from when no swatches exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CurrentColorSource {
    /// A query-string parameter of the page URL
    QueryParam { name: String },
    /// Text of the first element matching the selector
    Element { selector: String },
}

/// One block of text collected into the product description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionBlock {
    /// Elements to read
    pub selector: String,

    /// Only the first match is read
    #[serde(default)]
    pub first_only: bool,

    /// Split the text into trimmed lines before filtering
    #[serde(default)]
    pub split_lines: bool,

    /// Pieces must be longer than this many characters
    #[serde(default)]
    pub min_len: usize,

    /// Pieces must be shorter than this many characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_len: Option<usize>,
}

impl DescriptionBlock {
    fn new(selector: &str) -> Self {
        Self {
            selector: selector.to_string(),
            first_only: false,
            split_lines: false,
            min_len: 0,
            max_len: None,
        }
    }

    fn first_only(mut self) -> Self {
        self.first_only = true;
        self
    }

    fn lines(mut self) -> Self {
        self.split_lines = true;
        self
    }

    fn longer_than(mut self, len: usize) -> Self {
        self.min_len = len;
        self
    }

    fn shorter_than(mut self, len: usize) -> Self {
        self.max_len = Some(len);
        self
    }
}

/// Everything site-specific the engine needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteProfile {
    /// Profile name used in logs
    pub name: String,

    /// Path segment that marks a collection URL (`/collection/`)
    pub path_marker: String,

    /// Output shape
    pub schema: Schema,

    /// Category label derivation
    pub category_style: CategoryStyle,

    /// Anchors that point at product pages
    pub product_link_selector: String,

    /// Enabled "next page" control; `None` means the listing is a single page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_selector: Option<String>,

    /// Maximum listing pages per collection
    pub max_pages: usize,

    /// Maximum products per collection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_products: Option<usize>,

    /// Product title selectors, tried in order
    pub title_selectors: Vec<String>,

    /// Price element selector
    pub price_selector: String,

    /// Price text used when no price element is found
    pub price_fallback: String,

    /// Explicit color swatches
    pub swatches: SwatchSource,

    /// Currently selected color
    pub current_color: CurrentColorSource,

    /// Synthetic color name when nothing else is found
    pub default_color: String,

    /// Click through each color and re-read its images
    pub click_variants: bool,

    /// Primary product gallery images
    pub gallery_selector: String,

    /// Gallery images must be served from this host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallery_host: Option<String>,

    /// Broad fallback image query
    pub page_image_selector: String,

    /// Fallback images must contain this text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_image_host: Option<String>,

    /// Structural chrome whose images are never product images
    pub chrome_selector: String,

    /// Images whose URL contains any of these are skipped
    #[serde(default)]
    pub excluded_image_tokens: Vec<String>,

    /// Description text sources
    pub description: Vec<DescriptionBlock>,

    /// Images relocated per record
    pub max_images: usize,

    /// Root folder in the asset store
    pub upload_root: String,

    /// Origin used to absolutise site-relative image URLs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    /// Output workbook stem (`lecas_data` → `lecas_data.xlsx`)
    pub output_stem: String,

    /// Append to an existing workbook and skip products already in it
    #[serde(default)]
    pub resume: bool,
}

impl SiteProfile {
    /// Built-in profile for a site.
    pub fn builtin(kind: SiteKind) -> Self {
        match kind {
            SiteKind::Coolmate => Self::coolmate(),
            SiteKind::TheNewOriginals => Self::the_new_originals(),
            SiteKind::Seed => Self::seed(),
        }
    }

    /// Load a custom profile from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let profile: Self = toml::from_str(&content)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Check the profile can drive a crawl.
    pub fn validate(&self) -> Result<()> {
        if self.path_marker.trim().is_empty() {
            return Err(AppError::validation(format!(
                "profile '{}': path_marker is empty",
                self.name
            )));
        }
        if self.max_pages == 0 {
            return Err(AppError::validation(format!(
                "profile '{}': max_pages must be > 0",
                self.name
            )));
        }
        if self.max_products == Some(0) {
            return Err(AppError::validation(format!(
                "profile '{}': max_products must be > 0",
                self.name
            )));
        }
        if self.max_images == 0 {
            return Err(AppError::validation(format!(
                "profile '{}': max_images must be > 0",
                self.name
            )));
        }
        if self.title_selectors.is_empty() {
            return Err(AppError::validation(format!(
                "profile '{}': no title selectors",
                self.name
            )));
        }
        Ok(())
    }

    /// Whether a URL entered by the user is a collection of this site.
    pub fn accepts(&self, url: &str) -> bool {
        url.contains(&self.path_marker)
    }

    /// Output workbook file name.
    pub fn output_file_name(&self) -> String {
        format!("{}.xlsx", self.output_stem)
    }

    fn coolmate() -> Self {
        Self {
            name: "coolmate".to_string(),
            path_marker: "/collection/".to_string(),
            schema: Schema::PerVariant,
            category_style: CategoryStyle::Slug,
            product_link_selector: r#"a[href*="/product/"]"#.to_string(),
            next_page_selector: None,
            max_pages: 1,
            max_products: None,
            title_selectors: vec![
                "h1".to_string(),
                r#"[class*="product-title"], [class*="ProductTitle"]"#.to_string(),
            ],
            price_selector: r#"[class*="price"], [class*="Price"], .product-price"#.to_string(),
            price_fallback: "N/A".to_string(),
            swatches: SwatchSource::AltPrefix {
                prefix: "color ".to_string(),
            },
            current_color: CurrentColorSource::QueryParam {
                name: "color".to_string(),
            },
            default_color: "default".to_string(),
            click_variants: true,
            gallery_selector: r#"[class*="no-scrollbar"] button img"#.to_string(),
            gallery_host: Some("n7media.coolmate.me".to_string()),
            page_image_selector: r#"button img[alt*="Áo"], button img[alt*="Quần"]"#.to_string(),
            page_image_host: Some("n7media.coolmate.me".to_string()),
            chrome_selector: ".header, .footer, .menu, nav".to_string(),
            excluded_image_tokens: Vec::new(),
            description: vec![
                DescriptionBlock::new(
                    r#"[class*="feature"], [class*="benefit"], [class*="detail"]"#,
                )
                .shorter_than(200),
                DescriptionBlock::new(
                    r#"[class*="description"], [class*="Detail"], [class*="info"]"#,
                )
                .first_only()
                .lines(),
            ],
            max_images: 10,
            upload_root: "coolmate".to_string(),
            origin: None,
            output_stem: "lecas_data".to_string(),
            resume: false,
        }
    }

    fn the_new_originals() -> Self {
        Self {
            name: "theneworiginals".to_string(),
            path_marker: "/collections/".to_string(),
            schema: Schema::PerProduct,
            category_style: CategoryStyle::Slug,
            product_link_selector: r#"a[href*="/products/"]"#.to_string(),
            next_page_selector: Some(
                ".pagination__item--next:not(.pagination__item--disable)".to_string(),
            ),
            max_pages: 25,
            max_products: None,
            title_selectors: vec![r#"h1, .product-title, [class*="product-name"]"#.to_string()],
            price_selector: r#".price, [class*="price"], .product-price"#.to_string(),
            price_fallback: "N/A".to_string(),
            swatches: SwatchSource::InputName {
                name: "Màu".to_string(),
            },
            current_color: CurrentColorSource::Element {
                selector: ".current-option[data-selected-value]".to_string(),
            },
            default_color: "N/A".to_string(),
            click_variants: false,
            gallery_selector: r#".product-image img, .product-gallery img, [class*="ProductImage"] img, .product__media img"#.to_string(),
            gallery_host: None,
            page_image_selector: "img".to_string(),
            page_image_host: Some("theneworiginals".to_string()),
            chrome_selector: ".header, .footer, .nav, nav, .menu".to_string(),
            excluded_image_tokens: vec!["icon".to_string(), "logo".to_string()],
            description: vec![
                DescriptionBlock::new(".product-labels__title, .product-labels__description")
                    .longer_than(5)
                    .shorter_than(300),
                DescriptionBlock::new(".description-block__text .rte")
                    .first_only()
                    .lines()
                    .longer_than(5),
                DescriptionBlock::new(".accordion__text")
                    .longer_than(10)
                    .shorter_than(500),
            ],
            max_images: 15,
            upload_root: "theneworiginals".to_string(),
            origin: Some("https://theneworiginals.co".to_string()),
            output_stem: "tno_data".to_string(),
            resume: true,
        }
    }

    fn seed() -> Self {
        Self {
            name: "seed".to_string(),
            schema: Schema::Seed,
            category_style: CategoryStyle::Title,
            max_products: Some(100),
            title_selectors: vec!["h1.product__title, .description-block__heading".to_string()],
            price_fallback: "0".to_string(),
            description: vec![DescriptionBlock::new(".description-block__text .rte").first_only()],
            max_images: 10,
            output_stem: "seed_data".to_string(),
            resume: false,
            ..Self::the_new_originals()
        }
    }
}
