// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, REFERER};

use crate::error::{AppError, Result};
use crate::models::DownloadConfig;

/// Create the shared client used for image downloads.
///
/// Every request carries the configured User-Agent and Referer.
pub fn create_client(config: &DownloadConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    let referer = HeaderValue::from_str(&config.referer)
        .map_err(|e| AppError::config(format!("invalid referer {:?}: {e}", config.referer)))?;
    headers.insert(REFERER, referer);

    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .pool_max_idle_per_host(config.pool_max_idle)
        .build()?;
    Ok(client)
}

/// Fetch a URL and return the body, failing on non-success statuses.
pub async fn fetch_bytes(client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}
