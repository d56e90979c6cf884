//! Pipeline entry points for crawler operations.
//!
//! - `CrawlOrchestrator`: collections → products → variants → uploads → sink
//! - `run_crawler`: the same loop over a real browser and asset store

pub mod crawl;
pub mod orchestrator;

pub use crawl::{create_sink, run_crawler};
pub use orchestrator::{CrawlOrchestrator, ProductOutcome, RunReport, SkipReason};
