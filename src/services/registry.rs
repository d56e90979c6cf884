// src/services/registry.rs

//! Seed identifier registry.
//!
//! Assigns 1-based ids to categories and colors on first sighting and
//! hands out product ids in commit order. Maps only ever grow during a run.

use std::collections::HashMap;

use crate::models::{SeedCategory, SeedColor};
use crate::utils::text::normalize_color;

/// Which id space a name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Category,
    Color,
}

#[derive(Debug)]
pub struct SeedRegistry {
    categories: HashMap<String, u32>,
    colors: HashMap<String, u32>,
    next_category: u32,
    next_color: u32,
    next_product: u32,
}

impl Default for SeedRegistry {
    fn default() -> Self {
        Self {
            categories: HashMap::new(),
            colors: HashMap::new(),
            next_category: 1,
            next_color: 1,
            next_product: 1,
        }
    }
}

impl SeedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id for `name`, assigning the next one if it has not been seen.
    ///
    /// Colors are keyed by their normalized first word, so compound names
    /// sharing a first word share an id.
    pub fn get_or_create(&mut self, kind: IdKind, name: &str) -> u32 {
        let (map, counter, key) = match kind {
            IdKind::Category => (&mut self.categories, &mut self.next_category, name.to_string()),
            IdKind::Color => (&mut self.colors, &mut self.next_color, normalize_color(name)),
        };
        *map.entry(key).or_insert_with(|| {
            let id = *counter;
            *counter += 1;
            id
        })
    }

    /// Take the next product id. Call only once the product is committed.
    pub fn next_product_id(&mut self) -> u32 {
        let id = self.next_product;
        self.next_product += 1;
        id
    }

    /// Categories ordered by id.
    pub fn categories(&self) -> Vec<SeedCategory> {
        let mut rows: Vec<_> = self
            .categories
            .iter()
            .map(|(name, &id)| SeedCategory {
                id,
                name: name.clone(),
            })
            .collect();
        rows.sort_by_key(|row| row.id);
        rows
    }

    /// Colors ordered by id.
    pub fn colors(&self) -> Vec<SeedColor> {
        let mut rows: Vec<_> = self
            .colors
            .iter()
            .map(|(name, &id)| SeedColor {
                id,
                name: name.clone(),
            })
            .collect();
        rows.sort_by_key(|row| row.id);
        rows
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn color_count(&self) -> usize {
        self.colors.len()
    }
}
