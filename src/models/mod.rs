// src/models/mod.rs

//! Domain models for the crawler application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod product;
mod seed;
mod site;

// Re-export all public types
pub use config::{BrowserConfig, Config, CrawlerConfig, OutputConfig, UploadConfig};
pub use product::{CollectionTarget, ProductPage, ProductRef, Variant, VariantRecord};
pub use seed::{SeedCategory, SeedColor, SeedProduct};
pub use site::{
    CategoryStyle, CurrentColorSource, DescriptionBlock, Schema, SiteKind, SiteProfile,
    SwatchSource,
};
