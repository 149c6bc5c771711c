//! HTTP client for the source page.

use std::time::Duration;

use tracing::{debug, warn};

use stats_core::{Error, RawBundle, Result};

use crate::config::UpstreamConfig;
use crate::extract::extract;

/// Client for the stats source page.
#[derive(Debug, Clone)]
pub struct InnewsClient {
    config: UpstreamConfig,
    http: reqwest::Client,
}

impl InnewsClient {
    /// Creates a new client with the configured request timeout.
    pub fn new(config: UpstreamConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::upstream_request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, http })
    }

    /// Fetch the source page and extract the four raw tables.
    ///
    /// A single attempt, no retries: any network fault, non-success
    /// status, or extraction failure is terminal for this call and the
    /// caller decides whether to fall back.
    pub async fn fetch_raw(&self) -> Result<RawBundle> {
        debug!(url = %self.config.base_url, "fetching source page");

        let response = self
            .http
            .get(&self.config.base_url)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "source request failed");
                Error::upstream_request(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "source returned non-success status");
            return Err(Error::UpstreamStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::upstream_request(format!("failed to read body: {e}")))?;

        extract(&body)
    }
}
