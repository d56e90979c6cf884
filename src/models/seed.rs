//! Seed-schema rows: normalized categories, colors and products.

use serde::{Deserialize, Serialize};

/// A category row, deduplicated by its exact name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedCategory {
    pub id: u32,
    pub name: String,
}

/// A color row, deduplicated by its normalized name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedColor {
    pub id: u32,
    pub name: String,
}

/// A product row referencing its category and every color it comes in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedProduct {
    pub id: u32,
    pub category_id: u32,
    pub name: String,
    pub description: String,
    pub selling_price: i64,
    pub color_ids: Vec<u32>,
    pub images: Vec<String>,
}

impl SeedProduct {
    /// Color ids as written to the sheet (`1,2,3`).
    pub fn joined_color_ids(&self) -> String {
        self.color_ids
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Image URLs as written to the sheet.
    pub fn joined_images(&self) -> String {
        self.images.join(", ")
    }
}
