// src/storage/seed.rs

//! Three-sheet seed workbook, written once at the end of a run.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::error::{AppError, Result};
use crate::models::SeedProduct;
use crate::services::SeedRegistry;
use crate::storage::{
    CatalogSink, Record, SinkSummary, cell_text, header_format, timestamped_sibling, write_atomic,
};

const PRODUCT_HEADERS: [&str; 7] = [
    "id",
    "category_id",
    "name",
    "description",
    "selling_price",
    "color_ids",
    "images",
];
const PRODUCT_WIDTHS: [f64; 7] = [10.0, 15.0, 40.0, 60.0, 15.0, 20.0, 80.0];

pub struct SeedWorkbook {
    path: PathBuf,
    stem: String,
    products: Vec<SeedProduct>,
}

impl SeedWorkbook {
    pub fn new(dir: impl AsRef<Path>, stem: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{stem}.xlsx")),
            stem: stem.to_string(),
            products: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn render(&self, registry: &SeedRegistry) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();

        let sheet = workbook.add_worksheet();
        write_header(sheet, "Categories", &["id", "name"], &[10.0, 30.0])?;
        for (idx, category) in registry.categories().iter().enumerate() {
            let row = idx as u32 + 1;
            sheet.write_number(row, 0, category.id)?;
            sheet.write_string(row, 1, cell_text(&category.name))?;
        }

        let sheet = workbook.add_worksheet();
        write_header(sheet, "Colors", &["id", "name"], &[10.0, 20.0])?;
        for (idx, color) in registry.colors().iter().enumerate() {
            let row = idx as u32 + 1;
            sheet.write_number(row, 0, color.id)?;
            sheet.write_string(row, 1, cell_text(&color.name))?;
        }

        let sheet = workbook.add_worksheet();
        write_header(sheet, "Products", &PRODUCT_HEADERS, &PRODUCT_WIDTHS)?;
        for (idx, product) in self.products.iter().enumerate() {
            let row = idx as u32 + 1;
            sheet.write_number(row, 0, product.id)?;
            sheet.write_number(row, 1, product.category_id)?;
            sheet.write_string(row, 2, cell_text(&product.name))?;
            sheet.write_string(row, 3, cell_text(&product.description))?;
            sheet.write_number(row, 4, product.selling_price as f64)?;
            sheet.write_string(row, 5, product.joined_color_ids())?;
            sheet.write_string(row, 6, cell_text(&product.joined_images()))?;
        }

        Ok(workbook.save_to_buffer()?)
    }
}

fn write_header(sheet: &mut Worksheet, name: &str, headers: &[&str], widths: &[f64]) -> Result<()> {
    sheet.set_name(name)?;
    let format = header_format();
    for (col, (title, width)) in headers.iter().zip(widths).enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, *title, &format)?;
        sheet.set_column_width(col, *width)?;
    }
    Ok(())
}

#[async_trait]
impl CatalogSink for SeedWorkbook {
    /// Seed exports always start fresh.
    async fn load_existing(&mut self) -> Result<HashSet<String>> {
        Ok(HashSet::new())
    }

    async fn commit(&mut self, record: Record) -> Result<()> {
        match record {
            Record::Seed(product) => {
                self.products.push(product);
                Ok(())
            }
            Record::Row(_) => Err(AppError::validation("seed workbook only accepts seed products")),
        }
    }

    async fn finalize(&mut self, registry: &SeedRegistry) -> Result<SinkSummary> {
        let bytes = self.render(registry)?;
        if let Err(e) = write_atomic(&self.path, &bytes).await {
            let fallback = timestamped_sibling(&self.path, &self.stem);
            log::warn!(
                "Failed to save to {} ({e}), trying backup: {}",
                self.path.display(),
                fallback.display()
            );
            write_atomic(&fallback, &bytes).await?;
            self.path = fallback;
        }

        Ok(SinkSummary {
            path: Some(self.path.clone()),
            rows: self.products.len(),
            categories: registry.category_count(),
            colors: registry.color_count(),
        })
    }

    fn committed(&self) -> usize {
        self.products.len()
    }
}

#[cfg(test)]
mod tests {
    use calamine::{Reader, open_workbook_auto};

    use super::*;
    use crate::services::IdKind;

    fn sheet(path: &Path, name: &str) -> Vec<Vec<String>> {
        let mut workbook = open_workbook_auto(path).unwrap();
        workbook
            .worksheet_range(name)
            .unwrap()
            .rows()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[tokio::test]
    async fn test_writes_three_sheets_at_finalize() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut registry = SeedRegistry::new();
        let category_id = registry.get_or_create(IdKind::Category, "Ao Thun");
        let color_ids = vec![
            registry.get_or_create(IdKind::Color, "Đen"),
            registry.get_or_create(IdKind::Color, "Trắng Xanh"),
        ];

        let mut sink = SeedWorkbook::new(dir.path(), "seed_data");
        sink.commit(Record::Seed(SeedProduct {
            id: registry.next_product_id(),
            category_id,
            name: "Áo Thun - Classic".to_string(),
            description: "Mô tả".to_string(),
            selling_price: 159000,
            color_ids,
            images: vec!["https://x/1.jpg".to_string()],
        }))
        .await
        .unwrap();
        assert!(!sink.path().exists());

        let summary = sink.finalize(&registry).await.unwrap();
        assert_eq!(summary.rows, 1);
        assert_eq!(summary.categories, 1);
        assert_eq!(summary.colors, 2);

        let path = dir.path().join("seed_data.xlsx");
        assert_eq!(sheet(&path, "Categories"), [["id", "name"], ["1", "Ao Thun"]]);
        assert_eq!(
            sheet(&path, "Colors"),
            [["id", "name"], ["1", "Đen"], ["2", "Trắng"]]
        );
        assert_eq!(
            sheet(&path, "Products")[1],
            [
                "1",
                "1",
                "Áo Thun - Classic",
                "Mô tả",
                "159000",
                "1,2",
                "https://x/1.jpg"
            ]
        );
    }

    #[tokio::test]
    async fn test_rejects_flat_rows() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut sink = SeedWorkbook::new(dir.path(), "seed_data");
        let row = Record::Row(crate::models::VariantRecord {
            category: String::new(),
            product_name: String::new(),
            price: String::new(),
            color: String::new(),
            images: vec![],
            description: String::new(),
        });
        assert!(sink.commit(row).await.is_err());
        assert_eq!(sink.committed(), 0);
    }
}
