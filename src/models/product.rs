//! Collection, product and record data structures.

use serde::{Deserialize, Serialize};

use crate::models::{CategoryStyle, SiteProfile};
use crate::utils::text::category_title;
use crate::utils::url::{path_segment_after, strip_query};

/// A listing URL plus the category label derived from its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionTarget {
    url: String,
    category: String,
}

impl CollectionTarget {
    /// Build a target, deriving the category from the segment after the
    /// profile's path marker.
    pub fn new(url: impl Into<String>, profile: &SiteProfile) -> Self {
        let url = url.into();
        let slug = path_segment_after(&url, &profile.path_marker);
        let category = match (profile.category_style, slug) {
            (CategoryStyle::Slug, Some(slug)) => slug,
            (CategoryStyle::Slug, None) => "unknown".to_string(),
            (CategoryStyle::Title, Some(slug)) => category_title(&slug),
            (CategoryStyle::Title, None) => "Unknown".to_string(),
        };
        Self { url, category }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}

/// A canonical product URL owned by a collection's category.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductRef {
    pub url: String,
    pub category: String,
}

impl ProductRef {
    /// Create a reference, dropping any query string from the URL.
    pub fn new(url: &str, category: impl Into<String>) -> Self {
        Self {
            url: strip_query(url),
            category: category.into(),
        }
    }
}

/// Images and description rendered for one color.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Variant {
    pub color: String,
    pub images: Vec<String>,
    pub description: String,
}

/// Everything the walker read from one product page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductPage {
    /// Display name as shown on the page
    pub name: String,

    /// Raw price text, or the profile's fallback
    pub price: String,

    /// Every color discovered, in page order
    pub colors: Vec<String>,

    /// One entry per color when walking variants, otherwise a single
    /// entry shared by all colors
    pub variants: Vec<Variant>,
}

/// One emitted flat row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantRecord {
    pub category: String,
    pub product_name: String,
    pub price: String,
    pub color: String,
    pub images: Vec<String>,
    pub description: String,
}

impl VariantRecord {
    /// Image URLs as written to the sheet.
    pub fn joined_images(&self) -> String {
        self.images.join(", ")
    }
}
