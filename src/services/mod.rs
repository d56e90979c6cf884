//! Service layer for the crawler application.
//!
//! This module contains the business logic for:
//! - Listing pagination (`CollectionPaginator`)
//! - Product and color extraction (`VariantWalker`)
//! - Image re-hosting (`AssetRelocator`, `CloudinaryStore`)
//! - Seed id assignment (`SeedRegistry`)
//! - Seed names and descriptions (`ProductNameFormatter`, `DescriptionGenerator`)

mod naming;
mod paginator;
mod registry;
mod relocator;
mod walker;

pub use naming::{DescriptionGenerator, ProductNameFormatter};
pub use paginator::CollectionPaginator;
pub use registry::{IdKind, SeedRegistry};
pub use relocator::{AssetRelocator, AssetStore, CloudinaryCredentials, CloudinaryStore};
pub use walker::VariantWalker;
