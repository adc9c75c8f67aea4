//! Provider page fetching
//!
//! Builds the provider URL for an area code and downloads the raw page.
//! The response body is returned whatever the HTTP status; error pages
//! simply fail to match downstream.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::config::ProviderConfig;
use crate::error::LookupError;

/// Source of raw provider documents, keyed by area code
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, code: &str) -> Result<Vec<u8>, LookupError>;
}

/// Fetches provider pages over HTTP
pub struct HttpDocumentFetcher {
    client: Client,
    base_url: String,
    page_suffix: String,
}

impl HttpDocumentFetcher {
    /// Create a fetcher with the configured timeout and user agent
    pub fn new(config: &ProviderConfig) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| LookupError::network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            page_suffix: config.page_suffix.clone(),
        })
    }

    /// Page URL for an area code. The code is percent-encoded so it always
    /// stays a single path segment.
    #[must_use]
    pub fn page_url(&self, code: &str) -> String {
        format!(
            "{}/{}{}",
            self.base_url,
            urlencoding::encode(code),
            self.page_suffix
        )
    }
}

fn classify(err: &reqwest::Error, fallback: fn(String) -> LookupError) -> LookupError {
    if err.is_timeout() {
        LookupError::timeout(err.to_string())
    } else {
        fallback(err.to_string())
    }
}

#[async_trait]
impl DocumentFetcher for HttpDocumentFetcher {
    #[instrument(skip(self))]
    async fn fetch(&self, code: &str) -> Result<Vec<u8>, LookupError> {
        let url = self.page_url(code);
        debug!("Requesting provider page: {}", url);
        let start_time = Instant::now();

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| classify(&e, LookupError::Network))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Provider answered {} for {}, passing body through", status, url);
        }

        // consumes the response, releasing the connection on both paths
        let body = response
            .bytes()
            .await
            .map_err(|e| classify(&e, LookupError::Read))?;

        debug!(
            "Fetched {} bytes in {:.3}s",
            body.len(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(body.to_vec())
    }
}
