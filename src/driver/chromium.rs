// src/driver/chromium.rs

//! Chrome/Chromium page driver over the DevTools protocol.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig as ChromeConfig, Page};
use futures::StreamExt;
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::driver::{PageDriver, Script};
use crate::error::{AppError, Result};
use crate::models::BrowserConfig;

const CHROME_PATHS: &[&str] = &[
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/snap/bin/chromium",
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
];

const CHROME_COMMANDS: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
];

/// One browser with a single page that every navigation reuses.
pub struct ChromiumDriver {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl ChromiumDriver {
    /// Launch the browser and open a blank page.
    pub async fn launch(config: &BrowserConfig) -> Result<Self> {
        let executable = match &config.executable {
            Some(path) => path.clone(),
            None => find_chrome()?,
        };
        log::info!(
            "Launching browser {} (headless={})",
            executable.display(),
            config.headless
        );

        let (width, height) = config.window_size;
        let mut builder = ChromeConfig::builder()
            .chrome_executable(executable)
            .window_size(width, height);
        // with_head means NOT headless
        if !config.headless {
            builder = builder.with_head();
        }
        for arg in &config.args {
            builder = builder.arg(arg);
        }
        let chrome_config = builder
            .build()
            .map_err(|e| AppError::browser(format!("invalid browser config: {e}")))?;

        let (browser, mut handler) = Browser::launch(chrome_config)
            .await
            .map_err(|e| AppError::browser(format!("failed to launch browser: {e}")))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(AppError::browser)?;

        Ok(Self {
            browser,
            page,
            handler,
        })
    }

    /// Close the browser and wait for the protocol handler to stop.
    pub async fn close(mut self) -> Result<()> {
        self.browser.close().await.map_err(AppError::browser)?;
        let _ = self.browser.wait().await;
        let _ = self.handler.await;
        Ok(())
    }
}

#[async_trait]
impl PageDriver for ChromiumDriver {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<()> {
        match tokio::time::timeout(timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(AppError::crawl(url, e)),
            Err(_) => Err(AppError::timeout(
                format!("navigate {url}"),
                timeout.as_secs(),
            )),
        }
    }

    async fn evaluate(&self, script: &Script) -> Result<Value> {
        let result = self
            .page
            .evaluate(script.source.as_str())
            .await
            .map_err(|e| AppError::browser(format!("{:?} script failed: {e}", script.kind)))?;
        Ok(result.value().cloned().unwrap_or(Value::Null))
    }

    async fn click(&self, selector: &str) -> Result<bool> {
        let element = match self.page.find_element(selector).await {
            Ok(element) => element,
            Err(e) => {
                log::debug!("No element for {selector}: {e}");
                return Ok(false);
            }
        };
        element.click().await.map_err(AppError::browser)?;
        Ok(true)
    }
}

/// Locate a Chrome or Chromium executable.
fn find_chrome() -> Result<PathBuf> {
    if let Some(path) = CHROME_PATHS.iter().map(Path::new).find(|p| p.exists()) {
        log::debug!("Found Chrome at: {}", path.display());
        return Ok(path.to_path_buf());
    }

    for cmd in CHROME_COMMANDS {
        if let Ok(output) = std::process::Command::new("which").arg(cmd).output() {
            if output.status.success() {
                let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !path.is_empty() {
                    log::debug!("Found Chrome in PATH: {path}");
                    return Ok(PathBuf::from(path));
                }
            }
        }
    }

    Err(AppError::config(
        "Chrome/Chromium not found; install it or set [browser].executable",
    ))
}
