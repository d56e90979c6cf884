//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Navigation and pacing settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Browser launch settings
    #[serde(default)]
    pub browser: BrowserConfig,

    /// Asset store settings
    #[serde(default)]
    pub upload: UploadConfig,

    /// Workbook location
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.collection_timeout_secs == 0 {
            return Err(AppError::validation(
                "crawler.collection_timeout_secs must be > 0",
            ));
        }
        if self.crawler.product_timeout_secs == 0 {
            return Err(AppError::validation(
                "crawler.product_timeout_secs must be > 0",
            ));
        }
        if self.crawler.max_pages == Some(0) {
            return Err(AppError::validation("crawler.max_pages must be > 0"));
        }
        if self.crawler.max_products == Some(0) {
            return Err(AppError::validation("crawler.max_products must be > 0"));
        }
        if self.upload.timeout_secs == 0 {
            return Err(AppError::validation("upload.timeout_secs must be > 0"));
        }
        if self.upload.api_base.trim().is_empty() {
            return Err(AppError::validation("upload.api_base is empty"));
        }
        Ok(())
    }
}

/// Navigation timeouts, settle delays and limit overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Timeout for loading a collection listing page
    #[serde(default = "defaults::collection_timeout")]
    pub collection_timeout_secs: u64,

    /// Timeout for loading a product page
    #[serde(default = "defaults::product_timeout")]
    pub product_timeout_secs: u64,

    /// Wait after a listing page loads
    #[serde(default = "defaults::listing_settle")]
    pub listing_settle_ms: u64,

    /// Wait after scrolling a listing page to the bottom
    #[serde(default = "defaults::scroll_settle")]
    pub scroll_settle_ms: u64,

    /// Wait after a product page loads
    #[serde(default = "defaults::product_settle")]
    pub product_settle_ms: u64,

    /// Wait after switching to another color
    #[serde(default = "defaults::variant_settle")]
    pub variant_settle_ms: u64,

    /// Override the profile's page limit
    #[serde(default)]
    pub max_pages: Option<usize>,

    /// Override the profile's product limit
    #[serde(default)]
    pub max_products: Option<usize>,

    /// Seed for description generation; random when unset
    #[serde(default)]
    pub description_seed: Option<u64>,
}

impl CrawlerConfig {
    pub fn collection_timeout(&self) -> Duration {
        Duration::from_secs(self.collection_timeout_secs)
    }

    pub fn product_timeout(&self) -> Duration {
        Duration::from_secs(self.product_timeout_secs)
    }

    /// Settle delays with every wait removed, for driving fakes.
    pub fn without_delays(mut self) -> Self {
        self.listing_settle_ms = 0;
        self.scroll_settle_ms = 0;
        self.product_settle_ms = 0;
        self.variant_settle_ms = 0;
        self
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            collection_timeout_secs: defaults::collection_timeout(),
            product_timeout_secs: defaults::product_timeout(),
            listing_settle_ms: defaults::listing_settle(),
            scroll_settle_ms: defaults::scroll_settle(),
            product_settle_ms: defaults::product_settle(),
            variant_settle_ms: defaults::variant_settle(),
            max_pages: None,
            max_products: None,
            description_seed: None,
        }
    }
}

/// Browser launch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Run without a visible window
    #[serde(default)]
    pub headless: bool,

    /// Explicit Chrome/Chromium executable
    #[serde(default)]
    pub executable: Option<PathBuf>,

    /// Extra command-line switches
    #[serde(default)]
    pub args: Vec<String>,

    /// Window size as (width, height)
    #[serde(default = "defaults::window_size")]
    pub window_size: (u32, u32),
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: false,
            executable: None,
            args: Vec::new(),
            window_size: defaults::window_size(),
        }
    }
}

/// Asset store settings. Credentials come from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Single upload attempt timeout
    #[serde(default = "defaults::upload_timeout")]
    pub timeout_secs: u64,

    /// Upload API base URL
    #[serde(default = "defaults::api_base")]
    pub api_base: String,

    /// Override the profile's root folder
    #[serde(default)]
    pub root_folder: Option<String>,

    /// Name of the environment variable holding the credential
    #[serde(default = "defaults::credential_var")]
    pub credential_var: String,
}

impl UploadConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::upload_timeout(),
            api_base: defaults::api_base(),
            root_folder: None,
            credential_var: defaults::credential_var(),
        }
    }
}

/// Workbook location.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Directory for workbooks; the user's Downloads folder when unset
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl OutputConfig {
    /// Resolve the output directory.
    pub fn resolve_dir(&self) -> PathBuf {
        if let Some(dir) = &self.dir {
            return dir.clone();
        }
        dirs::download_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

mod defaults {
    pub fn collection_timeout() -> u64 {
        60
    }
    pub fn product_timeout() -> u64 {
        45
    }
    pub fn listing_settle() -> u64 {
        2000
    }
    pub fn scroll_settle() -> u64 {
        1000
    }
    pub fn product_settle() -> u64 {
        2000
    }
    pub fn variant_settle() -> u64 {
        2000
    }
    pub fn window_size() -> (u32, u32) {
        (1366, 900)
    }
    pub fn upload_timeout() -> u64 {
        30
    }
    pub fn api_base() -> String {
        "https://api.cloudinary.com/v1_1".into()
    }
    pub fn credential_var() -> String {
        "CLOUDINARY_URL".into()
    }
}
