// src/storage/flat.rs

//! Flat product workbook: one `Products` sheet, one row per record.
//!
//! Rows live in memory and the whole file is rewritten after each commit,
//! so a crash loses at most the record being processed.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use calamine::{Reader, open_workbook_auto};
use rust_xlsxwriter::Workbook;

use crate::error::{AppError, Result};
use crate::models::VariantRecord;
use crate::services::SeedRegistry;
use crate::storage::{
    CatalogSink, Record, SinkSummary, cell_text, header_format, timestamped_sibling, write_atomic,
};

pub const SHEET_NAME: &str = "Products";

pub const HEADERS: [&str; 7] = [
    "STT",
    "Category",
    "Tên sản phẩm",
    "Giá",
    "Màu sắc",
    "Danh sách link ảnh",
    "Mô tả sản phẩm",
];

/// Column holding the product name, the resume key.
const NAME_COLUMN: usize = 2;

const COLUMN_WIDTHS: [f64; 7] = [20.0, 20.0, 20.0, 20.0, 20.0, 80.0, 50.0];

/// Data columns after `STT`.
type RowCells = [String; 6];

pub struct FlatWorkbook {
    path: PathBuf,
    stem: String,
    resume: bool,
    /// Rows carried over from an earlier run
    existing: Vec<RowCells>,
    /// Rows committed by this run
    rows: Vec<RowCells>,
    fell_back: bool,
}

impl FlatWorkbook {
    /// Workbook at `{dir}/{stem}.xlsx`. With `resume`, an existing file is
    /// appended to instead of replaced.
    pub fn new(dir: impl AsRef<Path>, stem: &str, resume: bool) -> Self {
        Self {
            path: dir.as_ref().join(format!("{stem}.xlsx")),
            stem: stem.to_string(),
            resume,
            existing: Vec::new(),
            rows: Vec::new(),
            fell_back: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn cells(record: &VariantRecord) -> RowCells {
        [
            record.category.clone(),
            record.product_name.clone(),
            record.price.clone(),
            record.color.clone(),
            record.joined_images(),
            record.description.clone(),
        ]
    }

    /// Data rows (after the header) of the first sheet.
    fn read_rows(path: &Path) -> Result<Vec<RowCells>> {
        let mut workbook = open_workbook_auto(path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| AppError::validation(format!("{} has no sheets", path.display())))??;

        Ok(range
            .rows()
            .skip(1)
            .filter(|row| row.iter().any(|cell| !cell.to_string().is_empty()))
            .map(|row| std::array::from_fn(|i| row.get(i + 1).map(|c| c.to_string()).unwrap_or_default()))
            .collect())
    }

    fn render(&self) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;

        let header = header_format();
        for (col, (title, width)) in HEADERS.iter().zip(COLUMN_WIDTHS).enumerate() {
            let col = col as u16;
            sheet.write_string_with_format(0, col, *title, &header)?;
            sheet.set_column_width(col, width)?;
        }

        for (idx, cells) in self.existing.iter().chain(&self.rows).enumerate() {
            let row = idx as u32 + 1;
            sheet.write_number(row, 0, row as f64)?;
            for (col, text) in cells.iter().enumerate() {
                sheet.write_string(row, col as u16 + 1, cell_text(text))?;
            }
        }

        Ok(workbook.save_to_buffer()?)
    }

    /// Rewrite the file, moving to a timestamped sibling once if the
    /// primary path cannot be written.
    async fn flush(&mut self) -> Result<()> {
        let bytes = self.render()?;
        match write_atomic(&self.path, &bytes).await {
            Ok(()) => Ok(()),
            Err(e) if !self.fell_back => {
                self.use_fallback(&e);
                write_atomic(&self.path, &bytes).await
            }
            Err(e) => Err(e),
        }
    }

    fn use_fallback(&mut self, reason: &AppError) {
        let fallback = timestamped_sibling(&self.path, &self.stem);
        log::warn!(
            "Cannot use {} ({reason}), using new file: {}",
            self.path.display(),
            fallback.display()
        );
        self.path = fallback;
        self.fell_back = true;
    }
}

#[async_trait]
impl CatalogSink for FlatWorkbook {
    async fn load_existing(&mut self) -> Result<HashSet<String>> {
        if self.resume && self.path.exists() {
            match Self::read_rows(&self.path) {
                Ok(rows) => {
                    log::info!(
                        "Found existing workbook with {} rows, continuing from row {}",
                        rows.len(),
                        rows.len() + 2
                    );
                    self.existing = rows;
                }
                Err(e) => self.use_fallback(&e),
            }
        }

        self.flush().await?;
        log::info!("Workbook ready: {}", self.path.display());

        Ok(self
            .existing
            .iter()
            .map(|cells| cells[NAME_COLUMN - 1].clone())
            .filter(|name| !name.is_empty())
            .collect())
    }

    async fn commit(&mut self, record: Record) -> Result<()> {
        let Record::Row(record) = record else {
            return Err(AppError::validation("flat workbook only accepts product rows"));
        };
        self.rows.push(Self::cells(&record));

        if let Err(e) = self.flush().await {
            log::warn!("Workbook update failed, row kept for the final save: {e}");
        }
        Ok(())
    }

    async fn finalize(&mut self, _registry: &SeedRegistry) -> Result<SinkSummary> {
        self.flush().await?;
        Ok(SinkSummary {
            path: Some(self.path.clone()),
            rows: self.rows.len(),
            ..SinkSummary::default()
        })
    }

    fn committed(&self) -> usize {
        self.rows.len()
    }
}
