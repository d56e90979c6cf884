// src/driver/mod.rs

//! Page driver capability.
//!
//! The crawl engine only ever talks to a browser through [`PageDriver`]:
//! load a URL, run an extraction script, click a control. Everything the
//! engine asks of a page is a [`Script`], tagged with the question it
//! answers so test doubles can respond without a JavaScript engine.

#[cfg(feature = "browser")]
mod chromium;
mod scripts;

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{AppError, Result};

#[cfg(feature = "browser")]
pub use chromium::ChromiumDriver;
pub use scripts::{PageScripts, swatch_selector};

/// The question an extraction script answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptKind {
    /// Scroll to the bottom so lazy listings render
    ScrollToBottom,
    /// Product page URLs on a listing, query strings removed
    ProductLinks,
    /// Whether an enabled "next page" control exists
    HasNextPage,
    /// Product display name, `null` when absent
    ProductName,
    /// Raw price text, `null` when absent
    Price,
    /// Explicit color swatch names
    ColorSwatches,
    /// Currently selected color, `null` when absent
    CurrentColor,
    /// Primary gallery image sources
    GalleryImages,
    /// Every image outside the page chrome
    PageImages,
    /// Collected description text
    Description,
}

/// A JavaScript expression and the question it answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub kind: ScriptKind,
    pub source: String,
}

impl Script {
    pub fn new(kind: ScriptKind, source: impl Into<String>) -> Self {
        Self {
            kind,
            source: source.into(),
        }
    }
}

/// Narrow browser capability injected into the crawl engine.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Load `url`, failing if it does not finish within `timeout`.
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<()>;

    /// Evaluate a script in the current page and return its JSON value.
    async fn evaluate(&self, script: &Script) -> Result<Value>;

    /// Click the first element matching `selector`.
    ///
    /// Returns `Ok(false)` when no such element exists.
    async fn click(&self, selector: &str) -> Result<bool>;
}

/// Evaluate a script and deserialize its value.
pub async fn evaluate_as<T: DeserializeOwned>(
    driver: &dyn PageDriver,
    script: &Script,
) -> Result<T> {
    let value = driver.evaluate(script).await?;
    serde_json::from_value(value).map_err(|e| {
        AppError::browser(format!("unexpected result for {:?}: {e}", script.kind))
    })
}

/// Give client-side rendering time to catch up after a page change.
pub async fn settle(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}
