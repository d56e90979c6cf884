//! Output sinks for crawled records.
//!
//! Two workbook layouts are supported:
//!
//! ```text
//! {stem}.xlsx  (flat)           {stem}.xlsx  (seed)
//! └── Products                  ├── Categories  id, name
//!     STT, Category, ...        ├── Colors      id, name
//!                               └── Products    id, category_id, ...
//! ```
//!
//! The flat workbook is rewritten after every commit; the seed workbook is
//! written once when the run finalizes.

pub mod flat;
pub mod seed;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rust_xlsxwriter::{Format, FormatAlign};
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::models::{SeedProduct, VariantRecord};
use crate::services::SeedRegistry;

pub use flat::FlatWorkbook;
pub use seed::SeedWorkbook;

/// Longest text Excel accepts in one cell.
const MAX_CELL_CHARS: usize = 32_767;

/// One unit handed to a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Row(VariantRecord),
    Seed(SeedProduct),
}

/// What a sink wrote by the end of the run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SinkSummary {
    /// Final output location, when the sink writes a file
    pub path: Option<PathBuf>,
    /// Records written by this run
    pub rows: usize,
    pub categories: usize,
    pub colors: usize,
}

/// Durable destination for crawled records.
#[async_trait]
pub trait CatalogSink: Send {
    /// Product names already written by an earlier run.
    async fn load_existing(&mut self) -> Result<HashSet<String>>;

    /// Accept one record.
    async fn commit(&mut self, record: Record) -> Result<()>;

    /// Flush everything still pending. Runs exactly once, at the end.
    async fn finalize(&mut self, registry: &SeedRegistry) -> Result<SinkSummary>;

    /// Records accepted by this run.
    fn committed(&self) -> usize;
}

/// Write bytes atomically (write to temp, then rename).
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let tmp = path.with_extension("xlsx.tmp");
    let mut file = tokio::fs::File::create(&tmp).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    drop(file);

    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

/// `{dir}/{stem}_{YYYYmmdd_HHMMSS}.xlsx` next to the primary output.
fn timestamped_sibling(path: &Path, stem: &str) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    path.with_file_name(format!("{stem}_{stamp}.xlsx"))
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
}

/// Clip text to what a cell can hold.
fn cell_text(text: &str) -> &str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
