// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::Result;
use crate::models::UploadConfig;

/// User-Agent sent with asset store requests.
const USER_AGENT: &str = concat!("catalog-crawler/", env!("CARGO_PKG_VERSION"));

/// Create the asynchronous HTTP client used for uploads.
///
/// The client-level timeout bounds every upload request, so a single
/// attempt can never outlive `config.timeout_secs`.
pub fn create_upload_client(config: &UploadConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}
