//! HTTP client for the spreadsheet's Apps Script web endpoint
//!
//! The endpoint answers `GET {endpoint}?action={tasks_action}` with a JSON
//! body carrying the sheet rows. One request per call, no retries.

use std::time::Duration;

use serde_json::Value;

use super::extract_rows;
use crate::config::SourceConfig;
use crate::error::{Error, Result};
use crate::normalize::RawRecord;

/// Async client for the web endpoint
pub struct SheetClient {
    http_client: reqwest::Client,
    endpoint: String,
    tasks_action: String,
}

impl SheetClient {
    /// Create a client from configuration
    ///
    /// Returns an error if no endpoint is configured.
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let endpoint = config
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| Error::Config("source.endpoint is required".to_string()))?
            .to_string();

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint,
            tasks_action: config.tasks_action.clone(),
        })
    }

    fn request(&self) -> reqwest::RequestBuilder {
        self.http_client
            .get(&self.endpoint)
            .query(&[("action", self.tasks_action.as_str())])
    }

    /// Fetch the current study task rows
    pub async fn fetch_rows(&self) -> Result<Vec<RawRecord>> {
        tracing::debug!(endpoint = %self.endpoint, action = %self.tasks_action, "Fetching rows");

        let response = self
            .request()
            .send()
            .await
            .map_err(|e| Error::Source(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            return Err(Error::Source(format!("API error ({}): {}", status, error_text)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::Source(format!("failed to parse response: {}", e)))?;
        let rows = extract_rows(body)?;

        tracing::info!(rows = rows.len(), "Fetched rows from endpoint");
        Ok(rows)
    }
}

/// Synchronous wrapper for SheetClient
///
/// Provides blocking methods for use in synchronous code.
pub struct SyncSheetClient {
    inner: SheetClient,
    runtime: tokio::runtime::Runtime,
}

impl SyncSheetClient {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Source(format!("failed to create runtime: {}", e)))?;

        Ok(Self {
            inner: SheetClient::new(config)?,
            runtime,
        })
    }

    /// Fetch the current study task rows (blocking)
    pub fn fetch_rows(&self) -> Result<Vec<RawRecord>> {
        self.runtime.block_on(self.inner.fetch_rows())
    }
}
